//! # Conveyor CLI Application
//!
//! Terminal interface for the belt conveyor design calculator. Loads a
//! `.cvd` design document when a path is given (respecting file locks),
//! otherwise falls back to a built-in demo conveyor, prompts for the target
//! throughput, and prints both the standard and refined design passes.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use conveyor_core::calculations::design::DesignRun;
use conveyor_core::file_io::load_project_with_lock_check;
use conveyor_core::parameters::{
    BeltCleanerSpec, BeltGeometry, CarryIdlerSet, DesignParameters, FrictionCoefficients,
    IdlerPair, MaterialProperties, OperationParameters, PulleyPair, PulleySpec, ReturnIdlerSet,
    SkirtplateSpec,
};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

/// Demo installation: 143 m flat coal conveyor, 1.2 m belt at 4.8 m/s.
fn demo_parameters() -> DesignParameters {
    DesignParameters {
        material: MaterialProperties {
            density_t_m3: 0.85,
            surcharge_angle_deg: 20.0,
        },
        operation: OperationParameters {
            belt_speed_m_s: 4.8,
            feed_speed_m_s: 0.0,
            centre_length_m: 143.0,
            install_angle_deg: 0.0,
            wrap_angle_deg: 180.0,
        },
        coefficients: FrictionCoefficients::default(),
        belt: BeltGeometry {
            width_m: 1.2,
            thickness_m: 0.02,
            max_material_width_m: 1.03,
            linear_mass_kg_m: 16.44,
        },
        pulley: PulleyPair {
            drive: PulleySpec {
                diameter_m: 1.2,
                bearing_diameter_m: 0.25,
                mass_kg: 2400.0,
            },
            tail: PulleySpec {
                diameter_m: 1.0,
                bearing_diameter_m: 0.18,
                mass_kg: 1200.0,
            },
        },
        idler: IdlerPair {
            carry: CarryIdlerSet {
                spacing_m: 1.2,
                mass_kg: 15.5,
                allowable_sag_m: 0.01,
                roll_width_m: 0.436,
                install_angle_deg: 45.0,
            },
            r#return: ReturnIdlerSet {
                spacing_m: 3.0,
                mass_kg: 13.2,
                allowable_sag_m: 0.02,
            },
        },
        skirtplates: SkirtplateSpec {
            width_m: 0.634,
            length_m: 4.0,
        },
        belt_cleaners: BeltCleanerSpec {
            width_m: 1.2,
            thickness_m: 0.008,
            pressure_n_m2: 30_000.0,
            count: 4,
        },
    }
}

fn main() -> ExitCode {
    println!("Conveyor CLI - Belt Conveyor Design Calculator");
    println!("==============================================");
    println!();

    let params = match std::env::args().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            match load_project_with_lock_check(path) {
                Ok((project, lock_info)) => {
                    println!(
                        "Loaded {} (job {}, {})",
                        path.display(),
                        project.meta.job_id,
                        project.meta.engineer
                    );
                    if let Some(lock) = lock_info {
                        println!(
                            "Note: locked by {} on {} since {} (read-only)",
                            lock.user_id, lock.machine, lock.locked_at
                        );
                    }
                    println!();
                    project.conveyor_design
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    if let Ok(json) = serde_json::to_string_pretty(&e) {
                        eprintln!();
                        eprintln!("Error JSON:");
                        eprintln!("{}", json);
                    }
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            println!("No design document given; using demo conveyor");
            println!("(143 m flat coal conveyor, 1.2 m belt at 4.8 m/s)");
            println!();
            demo_parameters()
        }
    };

    let throughput = prompt_f64("Enter target throughput (t/h) [2300.0]: ", 2300.0);
    println!();

    let mut run = match DesignRun::solve(&params, throughput) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            return ExitCode::FAILURE;
        }
    };

    let r = &run.initial;
    println!("═══════════════════════════════════════");
    println!("  STANDARD DESIGN PASS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Capacity:");
    println!("  Cross-section:    {:.4} m²", r.cross_section_m2);
    println!("  Belt capacity:    {:.3} m³/s ({:.1} kg/m)", r.capacity_flow_m3_s, r.capacity_mass_kg_m);
    println!("  Material load:    {:.1} kg/m at {:.0} t/h", r.material_mass_kg_m, throughput);
    println!();
    println!("Resistances:");
    println!("  Main F_h:         {:>10.2} N", r.main_resistance_n);
    println!("  Secondary F_n:    {:>10.2} N", r.secondary_resistance_n);
    println!("  Concentrated F_s: {:>10.2} N", r.concentrated_resistance_n);
    println!("  Gravity F_st:     {:>10.2} N", r.gravity_resistance_n);
    println!();
    println!("Minimum sag tensions:");
    println!("  Carry strand:     {:>10.2} N", r.sag_tensions.carry_min_n);
    println!("  Return strand:    {:>10.2} N", r.sag_tensions.return_min_n);
    println!();
    println!("Drive:");
    println!("  Driving force:    {:>10.2} N", r.driving_force_n);
    println!("  Motor power:      {:>10.2} kW", r.motor_power_kw());

    let refined = match run.refine() {
        Ok(refined) => refined.clone(),
        Err(e) => {
            eprintln!("Error during refinement: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("═══════════════════════════════════════");
    println!("  ISO REFINEMENT PASS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Transmission checks (T1 / T2):");
    println!(
        "  Drive pulley:     {:>10.2} / {:>10.2} N {}",
        refined.drive_check.tight_n,
        refined.drive_check.slack_n,
        status_icon(refined.drive_check.satisfied)
    );
    println!(
        "  Tail pulley:      {:>10.2} / {:>10.2} N {}",
        refined.tail_check.tight_n,
        refined.tail_check.slack_n,
        status_icon(refined.tail_check.satisfied)
    );
    println!();
    println!("Wrap resistances (precise):");
    println!("  Drive pulley:     {:>10.2} N", refined.drive_wrap_resistance_n);
    println!("  Tail pulley:      {:>10.2} N", refined.tail_wrap_resistance_n);
    println!();
    println!("Drive:");
    println!("  Driving force:    {:>10.2} N", refined.driving_force_n);
    println!("  Motor power:      {:>10.2} kW", refined.motor_power_kw());
    println!();
    println!("═══════════════════════════════════════");

    println!();
    println!("JSON Output (for LLM/API use):");
    if let Ok(json) = serde_json::to_string_pretty(&run) {
        println!("{}", json);
    }

    ExitCode::SUCCESS
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[SAG GOVERNS]"
    }
}
