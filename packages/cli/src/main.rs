#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal client for the Kerbside vehicle data gateway.
//!
//! Runs the same lookups the API server exposes, for operators and
//! support staff. Credentials come from the same environment variables
//! as the server; see `kerbside_vehicle_data::GatewayConfig`.

use clap::{Parser, Subcommand};
use kerbside_format::{format_currency_gbp, format_date_uk};
use kerbside_vehicle_data::{VehicleDataGateway, plates};
use kerbside_vehicle_data_models::{ComprehensiveReport, MotHistory, VehicleRecord};

/// Look up vehicle and driver data from the terminal.
#[derive(Parser)]
#[command(name = "kerbside_cli")]
#[command(about = "Vehicle and driver data lookups")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// DVLA vehicle enquiry by registration.
    Vehicle {
        /// Registration number, any casing/spacing.
        registration: String,
    },

    /// DVLA driver enquiry by driving licence number.
    Driver {
        /// Driving licence number.
        licence_number: String,
    },

    /// DVSA MOT test history by registration.
    Mot {
        /// Registration number.
        registration: String,
    },

    /// Provenance history check by registration.
    History {
        /// Registration number.
        registration: String,
    },

    /// Comprehensive report: vehicle identity plus insurance, history
    /// and (with --mileage) valuation sections.
    Report {
        /// Registration number.
        registration: String,

        /// Current mileage; enables the valuation section.
        #[arg(long)]
        mileage: Option<u32>,

        /// Condition band for the valuation (e.g. "good").
        #[arg(long)]
        condition: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    let gateway = VehicleDataGateway::from_env();

    match cli.command {
        Commands::Vehicle { registration } => {
            let record = gateway.vehicle_enquiry(&registration).await?;
            print_vehicle(&record);
        }
        Commands::Driver { licence_number } => {
            let record = gateway.driver_enquiry(&licence_number).await?;
            let name = [
                record.driver.first_names.as_deref(),
                record.driver.last_name.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
            println!("Driver: {name}");
            if let Some(licence) = &record.licence {
                println!(
                    "Licence: {} ({})",
                    licence.licence_type.as_deref().unwrap_or("-"),
                    licence.status.as_deref().unwrap_or("-"),
                );
            }
            println!("Entitlements: {}", record.entitlements.len());
            println!("Endorsements: {}", record.endorsements.len());
        }
        Commands::Mot { registration } => {
            let history = gateway.mot_history(&registration).await?;
            print_mot_history(&history);
        }
        Commands::History { registration } => {
            let check = gateway.history_check(&registration).await?;
            let assessment = kerbside_risk::assess(&check);
            println!(
                "Risk: {} (score {})",
                assessment.level, assessment.score
            );
            for alert in &assessment.alerts {
                println!("  ! {alert}");
            }
        }
        Commands::Report {
            registration,
            mileage,
            condition,
        } => {
            let report = gateway
                .comprehensive_report(&registration, mileage, condition.as_deref())
                .await?;
            print_report(&report);
        }
    }

    Ok(())
}

fn print_vehicle(record: &VehicleRecord) {
    println!(
        "Registration: {}",
        plates::format_registration(&record.registration_number)
    );
    println!("Make: {}", record.make.as_deref().unwrap_or("-"));
    println!("Colour: {}", record.colour.as_deref().unwrap_or("-"));
    println!("Fuel: {}", record.fuel_type.as_deref().unwrap_or("-"));
    match (&record.tax_status, &record.tax_due_date) {
        (Some(status), Some(due)) => println!("Tax: {status} (due {})", format_date_uk(due)),
        (Some(status), None) => println!("Tax: {status}"),
        _ => {}
    }
    match (&record.mot_status, &record.mot_expiry_date) {
        (Some(status), Some(expiry)) => {
            println!("MOT: {status} (expires {})", format_date_uk(expiry));
        }
        (Some(status), None) => println!("MOT: {status}"),
        _ => {}
    }
}

fn print_mot_history(history: &MotHistory) {
    println!(
        "MOT history for {} {} {}",
        plates::format_registration(&history.registration),
        history.make.as_deref().unwrap_or(""),
        history.model.as_deref().unwrap_or(""),
    );
    for test in &history.mot_tests {
        println!(
            "  {} {} ({} defects)",
            test.completed_date
                .as_deref()
                .map(format_date_uk)
                .unwrap_or_else(|| "-".to_string()),
            test.test_result.as_deref().unwrap_or("-"),
            test.defects.len(),
        );
    }
    if history.mot_tests.is_empty() {
        println!("  No tests recorded");
    }
}

fn print_report(report: &ComprehensiveReport) {
    let vehicle = &report.vehicle;
    println!(
        "Vehicle: {} {} ({})",
        vehicle.make.as_deref().unwrap_or("-"),
        vehicle.model.as_deref().unwrap_or("-"),
        plates::format_registration(&vehicle.registration),
    );

    if let Some(valuation) = &report.valuation {
        println!("Valuation:");
        for (label, value) in [
            ("Retail", valuation.retail_value),
            ("Trade", valuation.trade_value),
            ("Part exchange", valuation.part_exchange_value),
            ("Private", valuation.private_value),
        ] {
            if let Some(v) = value {
                println!("  {label}: {}", format_currency_gbp(v));
            }
        }
    } else {
        println!("Valuation: not available");
    }

    if let Some(insurance) = &report.insurance {
        match insurance.insurance_group {
            Some(group) => println!(
                "Insurance group: {group}{}",
                insurance.group_rating.as_deref().unwrap_or("")
            ),
            None => println!("Insurance group: unknown"),
        }
    } else {
        println!("Insurance: not available");
    }

    if let Some(history) = &report.history {
        let assessment = kerbside_risk::assess(history);
        println!("Risk: {} (score {})", assessment.level, assessment.score);
        for alert in &assessment.alerts {
            println!("  ! {alert}");
        }
    } else {
        println!("History: not available");
    }
}
