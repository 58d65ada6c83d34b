// crate modules
use crate::aggregate::{highlight, key_points, KeyPoint};
use crate::calc;
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::fit::FitResult;
use crate::point::Axis;
use crate::record::ComparisonRecord;

// gtools modules
use gtools_utils::{f, OptionExt, SliceExt, StringExt, ValueExt};

// external crates
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Statistics of the percent differences over a series
///
/// Only records with a percent difference contribute. The standard deviation
/// is the sample estimate, so needs at least two values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of records with a percent difference
    pub count: usize,
    /// Mean percent difference
    pub mean: Option<f64>,
    /// Sample standard deviation of the percent difference
    pub std_dev: Option<f64>,
    /// Smallest percent difference
    pub min: Option<f64>,
    /// Largest percent difference
    pub max: Option<f64>,
}

impl Statistics {
    /// Collect statistics over the percent differences of `records`
    ///
    /// ```rust
    /// # use gtools_compare::{ComparisonRecord, Key, Statistics};
    /// let records: Vec<ComparisonRecord> = [-58.7, -54.2, -54.2]
    ///     .iter()
    ///     .map(|d| {
    ///         let mut r = ComparisonRecord::new(Key::Material("water".into()), 0.0);
    ///         r.difference = Some(*d);
    ///         r
    ///     })
    ///     .collect();
    ///
    /// let stats = Statistics::from_records(&records);
    /// assert_eq!(stats.count, 3);
    /// assert_eq!(stats.min, Some(-58.7));
    /// assert!((stats.mean.unwrap() + 55.7).abs() < 1e-9);
    /// ```
    pub fn from_records(records: &[ComparisonRecord]) -> Self {
        let differences: Vec<f64> = records.iter().filter_map(|r| r.difference).collect();
        Self {
            count: differences.len(),
            mean: differences.try_mean().ok(),
            std_dev: differences.try_std_dev().ok(),
            min: differences.try_min().ok(),
            max: differences.try_max().ok(),
        }
    }
}

/// Fitted coefficient of a thickness series against its reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesFit {
    /// Normalised material key
    pub material: String,
    /// Resolved fit parameters
    pub fit: FitResult,
    /// Half-value layer of the fitted μ (cm)
    pub half_value_layer: Option<f64>,
    /// Tenth-value layer of the fitted μ (cm)
    pub tenth_value_layer: Option<f64>,
    /// Reference μ at the beam energy (cm⁻¹)
    pub reference_mu: Option<f64>,
    /// Signed percent difference of the fitted μ from the reference
    pub difference: Option<f64>,
}

impl SeriesFit {
    pub fn new(material: &str, fit: FitResult, reference_mu: Option<f64>) -> Self {
        Self {
            material: material.material_key(),
            fit,
            half_value_layer: fit.half_value_layer().ok(),
            tenth_value_layer: fit.tenth_value_layer().ok(),
            reference_mu,
            difference: reference_mu.and_then(|r| calc::percent_difference(fit.mu, r).ok()),
        }
    }
}

/// All comparisons along one axis for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Axis of every record
    pub axis: Axis,
    /// Name of the series, usually the material
    pub label: String,
    /// Records in ascending key order
    pub records: Vec<ComparisonRecord>,
    /// Percent difference statistics
    pub statistics: Statistics,
    /// Range of the independent variable, or of densities for materials
    pub range: Option<(f64, f64)>,
    /// First record within tolerance of the target energy
    pub highlight: Option<ComparisonRecord>,
    /// Matches for the representative key energies
    pub key_points: Vec<KeyPoint>,
    /// Fit comparison for thickness series
    pub fit: Option<SeriesFit>,
}

impl Section {
    /// Assemble a section from aggregated records
    ///
    /// Highlights and key points only apply to the energy axis.
    pub fn new(
        axis: Axis,
        label: &str,
        records: Vec<ComparisonRecord>,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptySeries(f!("{label} {axis}")));
        }

        let (highlighted, key_points) = match axis {
            Axis::Energy => (
                highlight(&records, config.target_energy_kev, config.tolerance).cloned(),
                key_points(&records, &config.key_energies_kev, config.tolerance),
            ),
            _ => (None, Vec::new()),
        };

        let range_values: Vec<f64> = match axis {
            Axis::Material => records.iter().filter_map(|r| r.density).collect(),
            _ => records.iter().filter_map(|r| r.key.value()).collect(),
        };
        let range = match (range_values.try_min(), range_values.try_max()) {
            (Ok(min), Ok(max)) => Some((min, max)),
            _ => None,
        };

        Ok(Self {
            axis,
            label: label.to_string(),
            statistics: Statistics::from_records(&records),
            records,
            range,
            highlight: highlighted,
            key_points,
            fit: None,
        })
    }

    /// Attach a series-level fit comparison
    pub fn with_fit(mut self, fit: SeriesFit) -> Self {
        self.fit = Some(fit);
        self
    }

    /// Percent differences in record order
    pub fn differences(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.difference).collect()
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let units = match self.axis {
            Axis::Energy => " keV",
            Axis::Thickness => " cm",
            Axis::Material => " g/cm³",
        };

        let mut s = f!(
            "{} comparison: {} ({} points)\n",
            self.axis.to_string().capitalise(),
            self.label.capitalise(),
            self.records.len()
        );
        for record in &self.records {
            s += &f!("  {record}\n");
        }

        let stats = &self.statistics;
        s += &f!(
            "  Mean difference  {} % +/- {} %\n",
            stats.mean.map(|m| m.signed(2)).display(),
            stats.std_dev.fixed(2)
        );
        s += &f!(
            "  Difference range {} % to {} %\n",
            stats.min.map(|m| m.signed(2)).display(),
            stats.max.map(|m| m.signed(2)).display()
        );
        if let Some((min, max)) = self.range {
            s += &f!("  Range            {min} - {max}{units}\n");
        }
        if let Some(record) = &self.highlight {
            s += &f!("  Highlight        {record}\n");
        }
        for point in &self.key_points {
            s += &f!("  Key {:<12} {}\n", point.target, point.record);
        }
        if let Some(fit) = &self.fit {
            s += &f!(
                "  Fit              μ = {:.4} +/- {:.4} cm⁻¹ ({}), R² {}\n",
                fit.fit.mu,
                fit.fit.mu_error,
                fit.fit.source,
                fit.fit.r_squared.fixed(4)
            );
            s += &f!(
                "  HVL / TVL        {} / {} cm\n",
                fit.half_value_layer.fixed(2),
                fit.tenth_value_layer.fixed(2)
            );
            s += &f!(
                "  Reference μ      {} cm⁻¹, diff {} %\n",
                fit.reference_mu.fixed(4),
                fit.difference.map(|d| d.signed(2)).display()
            );
        }
        write!(f, "{}", s.trim_end())
    }
}

/// Flat row for CSV output
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    axis: Axis,
    series: &'a str,
    key: String,
    simulated: f64,
    reference: Option<f64>,
    difference_percent: Option<f64>,
    ratio: Option<f64>,
    ln_transmission: Option<f64>,
    local_mu: Option<f64>,
    transmission_error: Option<f64>,
    mu: Option<f64>,
    mu_rho: Option<f64>,
    density: Option<f64>,
    half_value_layer: Option<f64>,
    tenth_value_layer: Option<f64>,
    transmission: Option<f64>,
    relative_transmission: Option<f64>,
    attenuation_percent: Option<f64>,
}

impl<'a> CsvRow<'a> {
    fn new(series: &'a str, r: &ComparisonRecord) -> Self {
        Self {
            axis: r.axis(),
            series,
            key: match r.key.value() {
                Some(v) => v.to_string(),
                None => r.key.to_string(),
            },
            simulated: r.simulated,
            reference: r.reference,
            difference_percent: r.difference,
            ratio: r.ratio,
            ln_transmission: r.ln_transmission,
            local_mu: r.local_mu,
            transmission_error: r.transmission_error,
            mu: r.mu,
            mu_rho: r.mu_rho,
            density: r.density,
            half_value_layer: r.half_value_layer,
            tenth_value_layer: r.tenth_value_layer,
            transmission: r.transmission,
            relative_transmission: r.relative_transmission,
            attenuation_percent: r.attenuation_percent,
        }
    }
}

/// The assembled comparison of every analysed series
///
/// Sections are kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section to the end of the report
    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Every section for one axis
    pub fn sections_for(&self, axis: Axis) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.axis == axis)
    }

    /// Find a section by axis and label
    pub fn section(&self, axis: Axis, label: &str) -> Option<&Section> {
        let label = label.material_key();
        self.sections
            .iter()
            .find(|s| s.axis == axis && s.label.material_key() == label)
    }

    /// Serialise the full report to a pretty JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write every record as one CSV row
    ///
    /// ```rust
    /// # use gtools_compare::{compare_materials, AnalysisConfig, Axis, MaterialPoint, Report, Section};
    /// # use gtools_nist::ReferenceTable;
    /// let config = AnalysisConfig::default();
    /// let points = vec![MaterialPoint::new("water", 0.0342)];
    /// let records = compare_materials(&points, &ReferenceTable::cs137(), &config);
    ///
    /// let mut report = Report::new();
    /// report.push(Section::new(Axis::Material, "materials", records, &config).unwrap());
    ///
    /// let mut buffer = Vec::new();
    /// report.write_csv(&mut buffer).unwrap();
    ///
    /// let text = String::from_utf8(buffer).unwrap();
    /// assert!(text.starts_with("axis,series,key,simulated,reference,difference_percent"));
    /// assert_eq!(text.lines().count(), 2);
    /// ```
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for section in &self.sections {
            for record in &section.records {
                writer.serialize(CsvRow::new(&section.label, record))?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Write every record to a CSV file
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Writing {}", path.display());
        self.write_csv(BufWriter::new(File::create(path)?))
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let sections: Vec<String> = self.sections.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", sections.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::Source;
    use crate::point::Key;

    fn record(key: Key, difference: Option<f64>) -> ComparisonRecord {
        let mut r = ComparisonRecord::new(key, 1.0);
        r.difference = difference;
        r
    }

    #[test]
    fn statistics_skip_missing_differences() {
        let records = vec![
            record(Key::Energy(10.0), Some(1.0)),
            record(Key::Energy(20.0), None),
            record(Key::Energy(30.0), Some(3.0)),
        ];
        let stats = Statistics::from_records(&records);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(3.0));
    }

    #[test]
    fn single_record_has_no_std_dev() {
        let stats = Statistics::from_records(&[record(Key::Energy(10.0), Some(1.0))]);
        assert_eq!(stats.mean, Some(1.0));
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn statistics_are_repeatable() {
        let records: Vec<ComparisonRecord> = [0.1, -0.7, 2.3, 1e-3, 14.2]
            .iter()
            .enumerate()
            .map(|(i, d)| record(Key::Energy(i as f64), Some(*d)))
            .collect();
        let a = Statistics::from_records(&records);
        let b = Statistics::from_records(&records);
        assert_eq!(a.mean.map(f64::to_bits), b.mean.map(f64::to_bits));
        assert_eq!(a.std_dev.map(f64::to_bits), b.std_dev.map(f64::to_bits));
    }

    #[test]
    fn energy_section_highlights() {
        let records: Vec<ComparisonRecord> = [10.0, 100.0, 661.5, 1000.0]
            .iter()
            .map(|e| record(Key::Energy(*e), Some(0.0)))
            .collect();

        let config = AnalysisConfig::default();
        let section = Section::new(Axis::Energy, "water", records.clone(), &config).unwrap();
        assert_eq!(section.highlight.unwrap().key, Key::Energy(661.5));
        assert_eq!(section.key_points.len(), 4);
        assert_eq!(section.range, Some((10.0, 1000.0)));

        let config = AnalysisConfig {
            target_energy_kev: 700.0,
            ..Default::default()
        };
        let section = Section::new(Axis::Energy, "water", records, &config).unwrap();
        assert!(section.highlight.is_none());
    }

    #[test]
    fn empty_section() {
        let result = Section::new(Axis::Thickness, "water", vec![], &AnalysisConfig::default());
        assert!(matches!(result, Err(Error::EmptySeries(_))));
    }

    #[test]
    fn series_fit_derived() {
        let fit = FitResult {
            mu: 0.0857,
            mu_error: 0.0012,
            r_squared: Some(0.9991),
            source: Source::Parsed,
        };
        let series = SeriesFit::new("Muscle", fit, Some(0.0781));
        assert_eq!(series.material, "muscle");
        assert!(series.half_value_layer.unwrap() < series.tenth_value_layer.unwrap());
        assert!((series.difference.unwrap() - 9.731).abs() < 0.001);
    }
}
