use gtools_nist::{Error, Material, ReferenceSeries, ReferenceTable, CS137_ENERGY_KEV};
use rstest::{fixture, rstest};

#[fixture]
fn nist() -> ReferenceTable {
    ReferenceTable::nist()
}

#[rstest]
#[case(600.0, 8.956e-2)]
#[case(1000.0, 7.072e-2)]
#[case(20.0, 8.096e-1)]
#[case(1.0, 4.078e3)]
fn tabulated_energies(nist: ReferenceTable, #[case] energy: f64, #[case] expected: f64) {
    let value = nist.lookup("water", energy).unwrap();
    assert!((value.mu_rho - expected).abs() < 1e-12 * expected);
}

#[rstest]
fn cs137_line_is_interpolated(nist: ReferenceTable) {
    let value = nist.lookup("water", CS137_ENERGY_KEV).unwrap();

    // ln-ln between 600 and 800 keV
    let t = (662.0f64 / 600.0).ln() / (800.0f64 / 600.0).ln();
    let expected = (8.956e-2f64.ln() + t * (7.865e-2f64.ln() - 8.956e-2f64.ln())).exp();

    assert!((value.mu_rho - expected).abs() < 1e-12);
    assert!((value.mu_rho - 0.0857).abs() < 5e-4);
}

#[rstest]
fn half_value_layer_is_sensible(nist: ReferenceTable) {
    // about 8 cm of water halves a Cs-137 beam
    let mu = nist.lookup("water", CS137_ENERGY_KEV).unwrap().mu;
    let hvl = std::f64::consts::LN_2 / mu;
    assert!(hvl > 7.5 && hvl < 8.5);
}

#[rstest]
#[case(0.5)]
#[case(20_001.0)]
fn outside_of_table(nist: ReferenceTable, #[case] energy: f64) {
    assert!(matches!(
        nist.lookup("water", energy),
        Err(Error::EnergyOutsideTable { .. })
    ));
}

#[rstest]
fn unknown_material(nist: ReferenceTable) {
    assert!(matches!(
        nist.lookup("lead", 662.0),
        Err(Error::UnknownMaterial(m)) if m == "lead"
    ));
}

#[rstest]
#[case("bone", 662.0, 8.781e-1)]
#[case("Bone", 100.0, 1.184e1)]
#[case("muscle", 662.0, 2.071e-1)]
#[case("muscle", 1000.0, 1.711e-1)]
fn tissue_tables(
    nist: ReferenceTable,
    #[case] material: &str,
    #[case] energy: f64,
    #[case] expected: f64,
) {
    let value = nist.lookup(material, energy).unwrap();
    let density = Material::find(material).unwrap().density;
    assert!((value.mu_rho - expected).abs() < 1e-12 * expected);
    assert!((value.mu - expected * density).abs() < 1e-9);
}

#[rstest]
fn tissue_tables_interpolate(nist: ReferenceTable) {
    // between the 600 and 662 keV bone entries
    let value = nist.lookup("bone", 630.0).unwrap();
    assert!(value.mu_rho < 9.351e-1 && value.mu_rho > 8.781e-1);
    assert!(nist.lookup("bone", 25_000.0).is_err());
}

#[rstest]
#[case("water", 0.0828)]
#[case("Muscle", 0.0781)]
#[case(" BONE", 0.1311)]
fn cs137_references(#[case] material: &str, #[case] mu: f64) {
    let value = ReferenceTable::cs137().lookup(material, 662.0).unwrap();
    let density = Material::find(material).unwrap().density;
    assert!((value.mu - mu).abs() < 1e-12);
    assert!((value.mu_rho - mu / density).abs() < 1e-12);
}

#[test]
fn custom_table_from_json() {
    let table = ReferenceTable::from_json("./data/pmma_reference.json").unwrap();
    assert_eq!(table.materials().count(), 2);

    let pmma = table.lookup("PMMA", 662.0).unwrap();
    assert!(pmma.mu_rho < 0.08732 && pmma.mu_rho > 0.07668);
    assert!((pmma.mu - pmma.mu_rho * 1.19).abs() < 1e-12);
}

#[test]
fn invalid_table_from_json() {
    assert!(matches!(
        ReferenceTable::from_json("./data/unsorted_reference.json"),
        Err(Error::InvalidSeries { .. })
    ));
    assert!(matches!(
        ReferenceTable::from_json("./data/missing.json"),
        Err(Error::IOError(_))
    ));
}

#[test]
fn json_round_trip_keeps_lookups() {
    let table = ReferenceTable::cs137();
    let path = std::env::temp_dir().join("gtools_nist_cs137.json");
    std::fs::write(&path, table.to_json().unwrap()).unwrap();

    let read = ReferenceTable::from_json(&path).unwrap();
    assert_eq!(read, table);
}

#[test]
fn series_validation() {
    let water = Material::water();
    assert!(ReferenceSeries::new(water.clone(), vec![], vec![]).is_err());
    assert!(ReferenceSeries::new(water.clone(), vec![600.0], vec![0.1, 0.2]).is_err());
    assert!(ReferenceSeries::new(water.clone(), vec![600.0, 600.0], vec![0.1, 0.2]).is_err());
    assert!(ReferenceSeries::new(water, vec![600.0], vec![-0.1]).is_err());
}
