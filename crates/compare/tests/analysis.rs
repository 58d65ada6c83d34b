//! Integration tests for full analyses over the data files

use gtools_compare::{
    read_energy_csv, read_material_csv, read_thickness_csv, run_batch, Analysis,
    AnalysisConfig, Axis, EnergyPoint, Error, Job, Key, Source, Tolerance,
};
use gtools_fit::{read_fit_report, FitReport};
use rstest::{fixture, rstest};

#[fixture]
fn analysis() -> Analysis {
    Analysis::new(AnalysisConfig::default())
}

#[rstest]
fn three_material_comparison(analysis: Analysis) {
    let points = read_material_csv("./data/materials.csv").unwrap();
    let section = analysis.materials(&points).unwrap();

    // designated order, not file order
    let keys: Vec<String> = section.records.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(keys, vec!["water", "muscle", "bone"]);

    let expected = [-58.7, -54.2, -54.2];
    for (record, expected) in section.records.iter().zip(expected) {
        assert!((record.difference.unwrap() - expected).abs() < 0.2);
    }

    assert_eq!(section.statistics.count, 3);
    assert_eq!(section.range, Some((1.0, 1.85)));
}

#[rstest]
fn material_derived_quantities(analysis: Analysis) {
    let points = read_material_csv("./data/materials.csv").unwrap();
    let section = analysis.materials(&points).unwrap();
    let water = &section.records[0];
    let bone = &section.records[2];

    // water is the baseline
    assert_eq!(water.relative_transmission, Some(1.0));
    assert!((bone.relative_transmission.unwrap() - 0.74040 / 0.84275).abs() < 1e-12);

    assert!((bone.mu_rho.unwrap() - 0.0601 / 1.85).abs() < 1e-12);
    assert!((bone.half_value_layer.unwrap() - std::f64::consts::LN_2 / 0.0601).abs() < 1e-12);
    assert!((water.attenuation_percent.unwrap() - 15.725).abs() < 1e-9);
    assert!(water.transmission_error.unwrap() > 0.0);
    assert!((water.ratio.unwrap() - 0.0342 / 0.0828).abs() < 1e-12);
}

#[rstest]
fn material_transmission_from_counts(analysis: Analysis) {
    let points = read_material_csv("./data/materials_counts.csv").unwrap();
    let section = analysis.materials(&points).unwrap();

    let lead = section.records.last().unwrap();
    assert_eq!(lead.key, Key::Material("lead".into()));
    assert_eq!(lead.transmission, Some(0.00266));
    assert_eq!(lead.reference, None);
    assert!(lead.relative_transmission.is_some());
}

#[rstest]
fn missing_column(analysis: Analysis) {
    let result = analysis.run(&Job::Material {
        table: "./data/materials_missing_column.csv".into(),
    });
    assert!(matches!(
        result,
        Err(Error::MissingColumn { column, .. }) if column == "Mu_cm1"
    ));
}

#[rstest]
fn energy_highlight(analysis: Analysis) {
    let points = read_energy_csv("./data/energy_water.csv", None).unwrap();
    let section = analysis.energy(&points, "water").unwrap();

    let energies: Vec<f64> = section.records.iter().filter_map(|r| r.key.value()).collect();
    assert_eq!(energies, vec![10.0, 100.0, 661.5, 1000.0]);
    assert_eq!(section.highlight.as_ref().unwrap().key, Key::Energy(661.5));

    // the quoted NIST column is used as the reference
    assert_eq!(section.records[2].reference, Some(0.08573));
    assert!((section.records[3].difference.unwrap() + 0.297).abs() < 0.01);
}

#[rstest]
fn energy_highlight_missed() {
    let config = AnalysisConfig {
        target_energy_kev: 700.0,
        ..Default::default()
    };
    let analysis = Analysis::new(config);
    let points = read_energy_csv("./data/energy_water.csv", None).unwrap();
    let section = analysis.energy(&points, "water").unwrap();
    assert!(section.highlight.is_none());
}

#[rstest]
fn energy_interpolated_references(analysis: Analysis) {
    let points = read_energy_csv("./data/energy_water_mev.csv", None).unwrap();
    let section = analysis.energy(&points, "water").unwrap();
    assert_eq!(section.records.len(), 9);

    // 30 MeV is beyond the NIST table
    let last = section.records.last().unwrap();
    assert_eq!(last.key, Key::Energy(30_000.0));
    assert_eq!(last.reference, None);
    assert_eq!(section.statistics.count, 8);

    // every tabulated energy is within a percent
    for record in &section.records[..8] {
        assert!(record.difference.unwrap().abs() < 1.0);
    }

    // 662 keV is not in the scan, so only the other key energies
    let targets: Vec<f64> = section.key_points.iter().map(|k| k.target).collect();
    assert_eq!(targets, vec![10.0, 100.0, 1000.0, 10000.0]);
}

#[rstest]
#[case("bone", 11.90, 11.84)]
#[case("muscle", 0.2075, 0.2071)]
fn tissue_energy_scan(
    analysis: Analysis,
    #[case] material: &str,
    #[case] simulated: f64,
    #[case] reference: f64,
) {
    let points = vec![
        EnergyPoint::new(1000.0, 0.70),
        EnergyPoint::new(662.0, simulated),
        EnergyPoint::new(100.0, simulated),
    ];
    let section = analysis.energy(&points, material).unwrap();
    assert_eq!(section.statistics.count, 3);
    assert!(section.records.iter().all(|r| r.reference.is_some()));

    // tabulated at 100 keV for bone, 662 keV for muscle
    let exact = if material == "bone" { 0 } else { 1 };
    assert_eq!(section.records[exact].reference, Some(reference));
}

#[rstest]
fn energy_scan_from_transmission(analysis: Analysis) {
    let job = Job::Energy {
        table: "./data/energy_bone_transmission.csv".into(),
        material: "bone".into(),
    };
    let section = analysis.run(&job).unwrap();
    assert_eq!(section.label, "bone");
    assert_eq!(section.statistics.count, 4);
    assert_eq!(section.highlight.as_ref().unwrap().key, Key::Energy(662.0));

    // μ/ρ = -ln(T) / (5 cm * 1.85 g/cm³), within half a percent of NIST
    for record in &section.records {
        assert!(record.difference.unwrap().abs() < 0.5);
        assert_eq!(record.density, Some(1.85));
        assert!(record.transmission.is_some());
    }
    let highlight = section.highlight.unwrap();
    assert!((highlight.difference.unwrap() + 0.3).abs() < 0.01);

    // without a slab there is nothing to compare
    let points = read_energy_csv("./data/energy_bone_transmission.csv", None).unwrap();
    assert!(points.is_empty());
}

#[rstest]
fn thickness_with_fit_report(analysis: Analysis) {
    let points = read_thickness_csv("./data/thickness_water.csv").unwrap();
    let report = read_fit_report("./data/fit_water_results.txt");
    let section = analysis.thickness(&points, &report, "water").unwrap();

    let fit = section.fit.as_ref().unwrap();
    assert_eq!(fit.fit.source, Source::Parsed);
    assert_eq!(fit.fit.r_squared, Some(0.9998));
    assert!((fit.difference.unwrap() - 3.502).abs() < 0.001);

    // measured points within half a percent of the fit
    assert!(section.statistics.max.unwrap() < 0.5);
    assert!(section.statistics.min.unwrap() > -0.5);
    assert_eq!(section.range, Some((0.5, 15.0)));

    // recorded ln(T) is kept
    assert_eq!(section.records[0].ln_transmission, Some(-0.04427));
}

#[rstest]
fn thickness_report_without_r_squared(analysis: Analysis) {
    let points = read_thickness_csv("./data/thickness_bone.csv").unwrap();
    assert_eq!(points.len(), 5);

    let report = read_fit_report("./data/fit_bone_no_r2.txt");
    assert!(report.r_squared.is_missing());

    let section = analysis.thickness(&points, &report, "bone").unwrap();
    let fit = section.fit.unwrap().fit;
    assert_eq!(fit.mu, 0.1310);
    assert_eq!(fit.source, Source::FallbackComputed);
    assert!(fit.r_squared.unwrap() > 0.9999);
}

#[rstest]
fn thickness_without_report_uses_default(analysis: Analysis) {
    let points = read_thickness_csv("./data/thickness_water.csv").unwrap();
    let section = analysis
        .thickness(&points, &FitReport::default(), "water")
        .unwrap();
    let fit = section.fit.unwrap().fit;
    assert_eq!(fit.mu, 0.0430);
    assert_eq!(fit.source, Source::Default);
}

#[rstest]
fn configuration_from_json() {
    let config = AnalysisConfig::from_json("./data/config.json").unwrap();
    assert_eq!(config.tolerance, Tolerance::Relative(0.1));
    assert_eq!(config.material_order[0], "water");

    let analysis = Analysis::new(config);
    let points = read_thickness_csv("./data/thickness_water.csv").unwrap();
    let section = analysis
        .thickness(&points, &FitReport::default(), "water")
        .unwrap();
    assert_eq!(section.fit.unwrap().fit.mu, 0.0857);

    // 10% of 1000 keV
    let points = read_energy_csv("./data/energy_water.csv", None).unwrap();
    let section = analysis.energy(&points, "water").unwrap();
    assert_eq!(section.highlight.unwrap().key, Key::Energy(1000.0));
    assert_eq!(section.key_points.len(), 2);
}

#[rstest]
fn batch_skips_failures(analysis: Analysis) {
    let jobs = vec![
        Job::Energy {
            table: "./data/energy_water.csv".into(),
            material: "water".into(),
        },
        Job::Thickness {
            table: "./data/thickness_missing.csv".into(),
            report: None,
            material: "water".into(),
        },
        Job::Thickness {
            table: "./data/thickness_water.csv".into(),
            report: Some("./data/fit_missing.txt".into()),
            material: "water".into(),
        },
        Job::Material {
            table: "./data/materials_missing_column.csv".into(),
        },
        Job::Material {
            table: "./data/materials.csv".into(),
        },
    ];

    let batch = run_batch(&analysis, &jobs);

    let axes: Vec<Axis> = batch.report.sections.iter().map(|s| s.axis).collect();
    assert_eq!(axes, vec![Axis::Energy, Axis::Thickness, Axis::Material]);

    let skipped: Vec<&str> = batch.skipped.iter().map(|s| s.job.as_str()).collect();
    assert_eq!(skipped, vec!["water thickness scan", "material comparison"]);
    assert!(batch.skipped[0].reason.contains("thickness_missing.csv"));

    // a missing fit report is not a failure
    let water = batch.report.section(Axis::Thickness, "water").unwrap();
    assert_eq!(water.fit.as_ref().unwrap().fit.source, Source::Default);
}

#[rstest]
fn report_outputs(analysis: Analysis) {
    let jobs = vec![
        Job::Energy {
            table: "./data/energy_water.csv".into(),
            material: "water".into(),
        },
        Job::Material {
            table: "./data/materials.csv".into(),
        },
    ];
    let report = run_batch(&analysis, &jobs).report;

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["sections"].as_array().unwrap().len(), 2);

    let mut buffer = Vec::new();
    report.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.lines().count(), 1 + 4 + 3);
    assert!(text.lines().any(|l| l.starts_with("Material,materials,water,")));

    let summary = report.to_string();
    assert!(summary.contains("Energy comparison: Water (4 points)"));
    assert!(summary.contains("Material comparison: Materials (3 points)"));
}
