//! Tabulated reference data

/// Photon energies of the NIST water table (MeV)
pub(crate) const WATER_ENERGY_MEV: [f64; 36] = [
    1.00000E-03, 1.50000E-03, 2.00000E-03, 3.00000E-03, 4.00000E-03, 5.00000E-03, 6.00000E-03,
    8.00000E-03, 1.00000E-02, 1.50000E-02, 2.00000E-02, 3.00000E-02, 4.00000E-02, 5.00000E-02,
    6.00000E-02, 8.00000E-02, 1.00000E-01, 1.50000E-01, 2.00000E-01, 3.00000E-01, 4.00000E-01,
    5.00000E-01, 6.00000E-01, 8.00000E-01, 1.00000E+00, 1.25000E+00, 1.50000E+00, 2.00000E+00,
    3.00000E+00, 4.00000E+00, 5.00000E+00, 6.00000E+00, 8.00000E+00, 1.00000E+01, 1.50000E+01,
    2.00000E+01,
];

/// Mass attenuation coefficients of liquid water (cm²/g)
pub(crate) const WATER_MU_RHO: [f64; 36] = [
    4.078E+03, 1.376E+03, 6.173E+02, 1.929E+02, 8.278E+01, 4.258E+01, 2.464E+01, 1.037E+01,
    5.329E+00, 1.673E+00, 8.096E-01, 3.756E-01, 2.683E-01, 2.269E-01, 2.059E-01, 1.837E-01,
    1.707E-01, 1.505E-01, 1.370E-01, 1.186E-01, 1.061E-01, 9.687E-02, 8.956E-02, 7.865E-02,
    7.072E-02, 6.323E-02, 5.754E-02, 4.942E-02, 3.969E-02, 3.403E-02, 3.031E-02, 2.770E-02,
    2.429E-02, 2.219E-02, 1.941E-02, 1.813E-02,
];

/// Photon energies of the tissue tables (keV)
pub(crate) const TISSUE_ENERGY_KEV: [f64; 28] = [
    1.0, 5.0, 10.0, 20.0, 30.0, 50.0, 80.0, 100.0, 150.0, 200.0, 300.0, 400.0, 500.0, 600.0,
    662.0, 800.0, 1000.0, 1250.0, 1500.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0, 8000.0,
    10000.0, 15000.0, 20000.0,
];

/// Mass attenuation coefficients of compact bone (cm²/g)
pub(crate) const BONE_MU_RHO: [f64; 28] = [
    4.881E+03, 1.810E+03, 7.159E+02, 2.459E+02, 1.251E+02, 4.604E+01, 1.848E+01, 1.184E+01,
    5.496E+00, 3.491E+00, 1.910E+00, 1.365E+00, 1.092E+00, 9.351E-01, 8.781E-01, 7.810E-01,
    7.001E-01, 6.262E-01, 5.711E-01, 4.931E-01, 3.991E-01, 3.451E-01, 3.101E-01, 2.851E-01,
    2.521E-01, 2.311E-01, 2.001E-01, 1.851E-01,
];

/// Mass attenuation coefficients of skeletal muscle (cm²/g)
pub(crate) const MUSCLE_MU_RHO: [f64; 28] = [
    4.125E+03, 1.391E+03, 6.221E+02, 1.942E+02, 8.321E+01, 4.281E+01, 2.479E+01, 1.041E+01,
    5.351E+00, 1.681E+00, 8.121E-01, 3.771E-01, 2.691E-01, 2.281E-01, 2.071E-01, 1.841E-01,
    1.711E-01, 1.511E-01, 1.381E-01, 1.191E-01, 9.711E-02, 8.981E-02, 7.881E-02, 7.091E-02,
    6.341E-02, 5.771E-02, 4.961E-02, 3.981E-02,
];

/// Energy of the Cs-137 gamma line (keV)
pub const CS137_ENERGY_KEV: f64 = 662.0;

/// Narrow-beam linear attenuation coefficients at 662 keV (cm⁻¹)
pub(crate) const CS137_NARROW_BEAM: [(&str, f64); 3] =
    [("water", 0.0828), ("muscle", 0.0781), ("bone", 0.1311)];
