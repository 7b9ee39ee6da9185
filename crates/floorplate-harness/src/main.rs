//! Floorplate Headless Scenario Harness
//!
//! Validates the generation engine against the reference scenarios without a
//! host. Runs entirely in-process — no rendering, no persistence.
//!
//! Usage:
//!   cargo run -p floorplate-harness
//!   cargo run -p floorplate-harness -- --verbose
//!   cargo run -p floorplate-harness -- --json   (dump a Balanced layout)

use floorplate_core::{
    generate, standard_mix, AdvancedSettings, CoreConfig, CoreError, CoreKind, CorridorConfig,
    EgressConfig, Footprint, GenerateInput, Region, Side, StrategyKind, UnitTypeSpec,
};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    println!("=== Floorplate Scenario Harness ===\n");

    if json {
        dump_json();
        return;
    }

    let mut results = Vec::new();

    // 1. Standard mid-rise bar
    results.extend(run_standard_bar());

    // 2. Long bar needing a middle core
    results.extend(run_long_bar());

    // 3. Studios-only rigid mix
    results.extend(run_studios_only());

    // 4. Family mix with L-shaped ends
    results.extend(run_family_mix());

    // 5. Infeasible inputs
    results.extend(run_infeasible());

    // 6. Determinism sweep
    results.extend(run_determinism());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn base_input(length: f64, depth: f64) -> GenerateInput {
    GenerateInput {
        footprint: Footprint {
            length,
            depth,
            center_x: 0.0,
            center_y: 0.0,
            rotation: 0.0,
            floor_z: 0.0,
        },
        unit_types: standard_mix(),
        corridor: CorridorConfig::default(),
        cores: CoreConfig::default(),
        egress: EgressConfig::default(),
        alignment_strictness: 0.5,
        strategies: Vec::new(),
    }
}

// ── 1. Standard bar ─────────────────────────────────────────────────────

fn run_standard_bar() -> Vec<TestResult> {
    println!("--- Standard 91 m bar ---");
    let mut results = Vec::new();

    let options = match generate(&base_input(91.44, 19.81)) {
        Ok(o) => o,
        Err(e) => {
            results.push(TestResult {
                name: "standard_generates".into(),
                passed: false,
                detail: format!("generation failed: {e}"),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "standard_three_variants".into(),
        passed: options.len() == 3,
        detail: format!("{} variants produced", options.len()),
    });

    for option in &options {
        let label = format!("{:?}", option.strategy);
        results.push(TestResult {
            name: format!("standard_{label}_cores"),
            passed: option.cores.len() == 2
                && option.cores.iter().all(|c| c.kind == CoreKind::End),
            detail: format!("{} cores", option.cores.len()),
        });
        results.push(TestResult {
            name: format!("standard_{label}_egress"),
            passed: option.egress.all_pass(),
            detail: format!(
                "travel {:.1} / dead-end {:.1} / common {:.1}",
                option.egress.travel_distance.measured,
                option.egress.dead_end.measured,
                option.egress.common_path.measured
            ),
        });
        let worst_dev = option
            .stats
            .mix
            .iter()
            .map(|m| m.deviation.abs())
            .fold(0.0, f64::max);
        results.push(TestResult {
            name: format!("standard_{label}_mix"),
            passed: worst_dev <= 0.05,
            detail: format!(
                "{} units, worst mix deviation {:.1} points",
                option.stats.total_units,
                worst_dev * 100.0
            ),
        });
        results.push(TestResult {
            name: format!("standard_{label}_clean"),
            passed: option.warnings.is_empty(),
            detail: if option.warnings.is_empty() {
                "no warnings".into()
            } else {
                option.warnings.join("; ")
            },
        });
    }
    results
}

// ── 2. Long bar ─────────────────────────────────────────────────────────

fn run_long_bar() -> Vec<TestResult> {
    println!("--- Long 152 m bar ---");
    let mut results = Vec::new();

    match generate(&base_input(152.4, 19.81)) {
        Ok(options) => {
            let option = &options[0];
            let middles = option
                .cores
                .iter()
                .filter(|c| c.kind == CoreKind::Middle)
                .count();
            results.push(TestResult {
                name: "long_bar_middle_core".into(),
                passed: option.cores.len() == 3 && middles == 1,
                detail: format!("{} cores ({middles} middle)", option.cores.len()),
            });
            results.push(TestResult {
                name: "long_bar_travel".into(),
                passed: option.egress.travel_distance.pass,
                detail: format!(
                    "max travel {:.1} m (limit {:.1})",
                    option.egress.travel_distance.measured,
                    option.egress.travel_distance.limit
                ),
            });
        }
        Err(e) => results.push(TestResult {
            name: "long_bar_generates".into(),
            passed: false,
            detail: format!("generation failed: {e}"),
        }),
    }
    results
}

// ── 3. Studios only ─────────────────────────────────────────────────────

fn run_studios_only() -> Vec<TestResult> {
    println!("--- Studios only, rigid widths ---");
    let mut results = Vec::new();

    let mut input = base_input(45.72, 19.81);
    input.unit_types = vec![UnitTypeSpec {
        key: "studio".into(),
        display_name: "Studio".into(),
        target_area: 51.1,
        target_percentage: 100.0,
        color: "#8DA9C4".into(),
        advanced: AdvancedSettings {
            corner_eligible: true,
            l_shape_eligible: false,
            size_tolerance: 0.0,
            min_width: 4.5,
            max_width: 7.5,
            placement_priority: 20,
            expansion_weight: 1.0,
            compression_weight: 1.0,
        },
    }];

    match generate(&input) {
        Ok(options) => {
            let option = &options[0];
            let all_rects = option
                .units
                .iter()
                .all(|u| matches!(u.region, Region::Rect(_)));
            results.push(TestResult {
                name: "studios_no_l_shapes".into(),
                passed: all_rects,
                detail: format!("{} rectangular units", option.units.len()),
            });
            let in_bounds = option.units.iter().all(|u| {
                let w = u.region.bounds().width;
                (4.5..=7.5).contains(&w)
            });
            results.push(TestResult {
                name: "studios_width_bounds".into(),
                passed: in_bounds,
                detail: "all widths within hard bounds".into(),
            });
        }
        Err(e) => results.push(TestResult {
            name: "studios_generate".into(),
            passed: false,
            detail: format!("generation failed: {e}"),
        }),
    }
    results
}

// ── 4. Family mix ───────────────────────────────────────────────────────

fn run_family_mix() -> Vec<TestResult> {
    println!("--- Family mix, L-shaped ends ---");
    let mut results = Vec::new();

    let mut input = base_input(91.44, 16.76);
    input.corridor = CorridorConfig { width: 1.83 };
    input.cores = CoreConfig {
        width: 3.66,
        depth: 6.71,
        side: Side::North,
    };
    for (spec, pct) in input.unit_types.iter_mut().zip([10.0, 20.0, 40.0, 30.0]) {
        spec.target_percentage = pct;
    }
    input.strategies = vec![StrategyKind::Balanced];

    match generate(&input) {
        Ok(options) => {
            let option = &options[0];
            let wraps = option
                .units
                .iter()
                .filter(|u| matches!(u.region, Region::Polygon(_)))
                .count();
            results.push(TestResult {
                name: "family_l_shapes".into(),
                passed: wraps >= 2,
                detail: format!("{wraps} L-shaped units"),
            });
            results.push(TestResult {
                name: "family_efficiency".into(),
                passed: option.stats.efficiency >= 0.78,
                detail: format!("efficiency {:.3}", option.stats.efficiency),
            });
        }
        Err(e) => results.push(TestResult {
            name: "family_generate".into(),
            passed: false,
            detail: format!("generation failed: {e}"),
        }),
    }
    results
}

// ── 5. Infeasible inputs ────────────────────────────────────────────────

fn run_infeasible() -> Vec<TestResult> {
    println!("--- Infeasible inputs ---");
    let mut results = Vec::new();

    let short = generate(&base_input(30.0, 19.81));
    results.push(TestResult {
        name: "short_building_rejected".into(),
        passed: matches!(short, Err(CoreError::EgressInfeasible { .. })),
        detail: match &short {
            Err(e) => format!("{e}"),
            Ok(_) => "unexpectedly generated".into(),
        },
    });

    let narrow = generate(&base_input(91.44, 10.0));
    results.push(TestResult {
        name: "narrow_building_rejected".into(),
        passed: matches!(narrow, Err(CoreError::InvalidFootprint(_))),
        detail: match &narrow {
            Err(e) => format!("{e}"),
            Ok(_) => "unexpectedly generated".into(),
        },
    });

    results
}

// ── 6. Determinism ──────────────────────────────────────────────────────

fn run_determinism() -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let input = base_input(91.44, 19.81);
    let first = generate(&input);
    let second = generate(&input);
    let identical = match (&first, &second) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    results.push(TestResult {
        name: "repeat_run_identical".into(),
        passed: identical,
        detail: "two runs compared structurally".into(),
    });

    results
}

// ── JSON dump ───────────────────────────────────────────────────────────

fn dump_json() {
    let mut input = base_input(91.44, 19.81);
    input.strategies = vec![StrategyKind::Balanced];
    match generate(&input) {
        Ok(options) => match serde_json::to_string_pretty(&options[0]) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("serialization failed: {e}"),
        },
        Err(e) => eprintln!("generation failed: {e}"),
    }
}
