//! End-to-end tests on a rectangular pretensioned section
//!
//! 300 x 600 mm rectangle (SI base units), 40 MPa concrete, a single layer
//! of strand 150 mm above the soffit stressed to 800 kN.

use psc_section::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn concrete() -> Concrete {
    Concrete::rectangular_block(30e9, 40e6, 3.5e6, 0.85, 0.77, 0.003)
}

fn strand() -> SteelStrand {
    SteelStrand::elastic_plastic(195e9, 1500e6, 0.035, 800e3)
}

fn build_section() -> PrestressedSection {
    let mut geometry = SectionGeometry::new();
    geometry.add_concrete(Polygon::rectangle(0.3, 0.6), concrete());
    geometry.add_strand(800e-6, 0.15, 0.15, strand());
    PrestressedSection::new(geometry, None).unwrap()
}

#[test]
fn gross_properties_and_prestress_actions() {
    init_logger();
    let section = build_section();
    let gp = section.gross_properties();

    assert!((gp.area - (0.18 + 800e-6)).abs() < 1e-9);
    assert!((gp.n_prestress - 800e3).abs() < 1e-6);
    // strand 150 mm below the centroid
    assert!((gp.m_prestress - 800e3 * (0.15 - gp.elastic.cy)).abs() < 1e-3);
    assert!(gp.m_prestress < 0.0);
    assert!((gp.conc_ultimate_strain - 0.003).abs() < 1e-12);
}

#[test]
fn meshed_reinforcement_is_rejected() {
    let mut geometry = SectionGeometry::new();
    geometry.add_concrete(Polygon::rectangle(0.3, 0.6), concrete());
    geometry.add_region(Region::new(
        Polygon::rectangle_at(0.125, 0.05, 0.05, 0.05),
        Material::Steel(Steel::elastic_plastic(200e9, 500e6, 0.05)),
    ));

    assert!(matches!(
        PrestressedSection::new(geometry, None),
        Err(SectionError::InvalidGeometry(_))
    ));
}

#[test]
fn cracking_moments_bracket_zero() {
    init_logger();
    let section = build_section();
    let gp = section.gross_properties();

    let cracked = section.cracked_properties(400e3, 0.0).unwrap();
    let (m_cr_pos, m_cr_neg) = cracked.m_cr;

    assert!(m_cr_pos > 0.0);
    assert!(m_cr_neg < 0.0);

    // hand check of the sagging cracking moment:
    // m_cr = (f_t + n E / E_A) / E * e_ixx / d - m_prestress
    let n = 800e3;
    let e_ixx = gp.elastic.e_ixx;
    let d = gp.elastic.cy;
    let f_r = 3.5e6 + n * 30e9 / gp.elastic.e_a;
    let expected = (f_r / 30e9) * (e_ixx / d) - gp.m_prestress;
    assert!((m_cr_pos - expected).abs() / expected < 1e-9);
}

#[test]
fn axial_compression_raises_the_cracking_moment() {
    let section = build_section();
    let m_int = section.gross_properties().m_prestress;

    let m_lo = section.cracking_moment(800e3, m_int, true);
    let m_hi = section.cracking_moment(2000e3, m_int, true);
    assert!(m_hi > m_lo);
}

#[test]
fn cracked_analysis_zeros_the_crack_front_stress() {
    init_logger();
    let section = build_section();

    let cracked = section.cracked_properties(400e3, 0.0).unwrap();
    assert!(cracked.d_nc > 0.0 && cracked.d_nc < 0.6);
    assert!(!cracked.cracked_regions.is_empty());

    // the minimum concrete stress vanishes at the converged neutral axis
    let stress = section.cracked_stress(&cracked).unwrap();
    let (min, max) = stress.concrete_stress_limits().unwrap();
    assert!(min.abs() < 0.2e6, "crack front stress {min} not near zero");
    assert!(max > 1e6);

    // cracked section is softer than the gross section
    assert!(cracked.elastic.e_ixx < section.gross_properties().elastic.e_ixx);

    // equilibrium round-trip about the cracked centroid: net internal
    // actions recover the external ones
    assert!(stress.total_force().abs() < 1.0);
    assert!((stress.total_moment_x() - cracked.m).abs() < 1.0);
}

#[test]
fn fully_compressed_section_reports_no_tension() {
    let section = build_section();

    // a small sagging moment keeps the whole section in compression
    let result = section.cracked_properties(130e3, 0.0);
    match result {
        Err(SectionError::AnalysisFailed(msg)) => {
            assert!(msg.contains("no tension"), "unexpected message: {msg}")
        }
        other => panic!("expected an analysis failure, got {other:?}"),
    }
}

#[test]
fn uncracked_stress_is_self_equilibrated() {
    init_logger();
    let section = build_section();

    let m_ext = 100e3;
    let stress = section.uncracked_stress(0.0, m_ext).unwrap();

    // internal actions recover the external ones: the prestress is internal
    assert!(stress.total_force().abs() < 1.0);
    assert!((stress.total_moment_x() - m_ext).abs() < 1.0);

    // the strand stays in tension
    assert!(stress.tendons[0].stress < 0.0);
}

#[test]
fn prestress_alone_is_self_equilibrated() {
    init_logger();
    let section = build_section();
    let gp = section.gross_properties();

    let stress = section.uncracked_stress(0.0, 0.0).unwrap();
    assert!(stress.total_force().abs() < 1.0);
    assert!(stress.total_moment_x().abs() < 1.0);

    // the concrete resultant carries the prestress moment, less the small
    // elastic shortening relief in the strand
    let conc_moment: f64 = stress.concrete.iter().map(|p| p.m_x).sum();
    assert!((conc_moment - gp.m_prestress).abs() < 0.1 * gp.m_prestress.abs());

    // concrete compression peaks at the soffit
    let (min, max) = stress.concrete_stress_limits().unwrap();
    assert!(max > min);
    assert!(max > 0.0);
}

#[test]
fn moment_curvature_starts_at_zero_moment() {
    init_logger();
    let section = build_section();

    let results = section
        .moment_curvature(true, 0.0, &MomentCurvatureConfig::default())
        .unwrap();

    // the initial curvature balances the prestress moment
    assert!(results.moment[0].abs() < 10.0);
    assert!(results.kappa[0] < 0.0);

    // curvature strictly increases, moments stay finite
    for pair in results.kappa.windows(2) {
        assert!(pair[1] > pair[0]);
    }
    assert!(results.moment.iter().all(|m| m.is_finite()));

    // the sweep terminates at a material failure
    let failure = results.failure.expect("sweep should reach failure");
    assert_eq!(failure.material, FailureMaterial::Concrete);
    assert!(failure.kappa > 0.0);

    // peak moment exceeds the cracking moment
    let m_cr = section.cracking_moment(
        800e3,
        section.gross_properties().m_prestress,
        true,
    );
    let m_max = results.moment.iter().cloned().fold(f64::MIN, f64::max);
    assert!(m_max > m_cr);
}

#[test]
fn service_stress_recovers_the_equilibrium_state() {
    init_logger();
    let section = build_section();

    let results = section
        .moment_curvature(true, 0.0, &MomentCurvatureConfig::default())
        .unwrap();

    // re-evaluate at an analysed curvature: the stress resultants must
    // reproduce the recorded state
    let idx = results.kappa.len() / 2;
    let kappa = results.kappa[idx];
    let m = results.moment[idx];

    let stress = section.service_stress(&results, m, Some(kappa)).unwrap();
    assert!(stress.total_force().abs() < 100.0);
    assert!((stress.total_moment_x() - m).abs() < 1e-4 * m.abs() + 50.0);

    // interpolated curvature round trip
    let kappa_interp = results.curvature_at_moment(m).unwrap();
    assert!((kappa_interp - kappa).abs() < 1e-2 * kappa.abs() + 1e-9);

    // the interpolated path lands close to the recorded moment
    let interpolated = section.service_stress(&results, m, None).unwrap();
    assert!((interpolated.total_moment_x() - m).abs() < 0.05 * m.abs());
}

#[test]
fn service_stress_rejects_out_of_range_moments() {
    let section = build_section();
    let results = section
        .moment_curvature(true, 0.0, &MomentCurvatureConfig::default())
        .unwrap();

    let m_max = results.moment.iter().cloned().fold(f64::MIN, f64::max);
    assert!(matches!(
        section.service_stress(&results, 2.0 * m_max, None),
        Err(SectionError::AnalysisFailed(_))
    ));
}

#[test]
fn ultimate_capacity_balances_the_axial_force() {
    init_logger();
    let section = build_section();

    let ultimate = section.ultimate_capacity(true, 0.0).unwrap();
    assert!(ultimate.n.abs() < 1e3);
    assert!(ultimate.m > 0.0);
    assert!(ultimate.d_n > 0.0 && ultimate.d_n < 0.6);
    assert!(ultimate.k_u > 0.0 && ultimate.k_u < 1.0);

    // the stress state at ultimate reproduces the capacity
    let stress = section.ultimate_stress(&ultimate).unwrap();
    assert!((stress.total_force() - ultimate.n).abs() < 1.0);
    assert!((stress.total_moment_x() - ultimate.m).abs() < 1.0);

    // strand at ultimate carries close to its yield stress in tension
    assert!(stress.tendons[0].stress < -1000e6);
}

#[test]
fn hogging_capacity_is_negative() {
    let section = build_section();

    let ultimate = section.ultimate_capacity(false, 0.0).unwrap();
    assert!(ultimate.n.abs() < 1e3);
    assert!(ultimate.m < 0.0);

    // sagging capacity dominates with the strand near the soffit
    let sagging = section.ultimate_capacity(true, 0.0).unwrap();
    assert!(sagging.m.abs() > ultimate.m.abs());
}

#[test]
fn uniform_ultimate_strain_field() {
    let section = build_section();

    // fabricate the uniform-strain state
    let squash = UltimateCapacity {
        theta: 0.0,
        d_n: f64::INFINITY,
        n: 0.0,
        m: 0.0,
        k_u: 0.0,
    };
    let stress = section.ultimate_stress(&squash).unwrap();

    for piece in &stress.concrete {
        assert!((piece.strain_min - 0.003).abs() < 1e-12);
        assert!((piece.strain_max - 0.003).abs() < 1e-12);
    }
    // strand strain is the field strain less the prestress strain
    let strand = strand();
    let expected = 0.003 - strand.prestress_strain(800e-6);
    assert!((stress.tendons[0].strain - expected).abs() < 1e-12);
}

#[test]
fn interaction_diagrams_are_unsupported() {
    let section = build_section();
    assert!(matches!(
        section.moment_interaction_diagram(),
        Err(SectionError::Unsupported(_))
    ));
    assert!(matches!(
        section.biaxial_bending_diagram(),
        Err(SectionError::Unsupported(_))
    ));
}

#[test]
fn results_serialize_to_json() {
    let section = build_section();
    let cracked = section.cracked_properties(400e3, 0.0).unwrap();
    let json = cracked.to_json().unwrap();
    assert!(json.contains("d_nc"));

    let ultimate = section.ultimate_capacity(true, 0.0).unwrap();
    let stress = section.ultimate_stress(&ultimate).unwrap();
    assert!(stress.to_json().unwrap().contains("tendons"));
}
