//! Comprehensive report composition.
//!
//! The report is a best-effort aggregate: the CAP vehicle identity is
//! resolved first and its failure is the whole operation's failure; no
//! partial vehicle data is ever returned. Once the identity is known,
//! the optional sections fan out concurrently and are settled
//! individually: one section failing neither cancels nor fails the
//! others, it is simply omitted from the result. Deciding what to keep
//! is a separate pure reduction ([`assemble_report`]) over the settled
//! outcomes.

use kerbside_vehicle_data_models::{
    CapVehicle, ComprehensiveReport, DataError, HistoryCheck, InsuranceDetails, Valuation,
};

use crate::{VehicleDataGateway, plates};

/// Runs the full composition: sequential vehicle resolution, then the
/// concurrent section fan-out. A valuation is only attempted when
/// mileage was supplied.
///
/// # Errors
///
/// Returns the vehicle resolution's error unchanged when step one
/// fails; section failures never surface here.
pub(crate) async fn comprehensive(
    gateway: &VehicleDataGateway,
    registration: &str,
    mileage: Option<u32>,
    condition: Option<&str>,
) -> Result<ComprehensiveReport, DataError> {
    let reg = plates::validate_registration(registration)?;

    let vehicle = gateway.cap_vehicle(&reg).await?;
    log::debug!(
        "Resolved {} to CAP id {}, fanning out report sections",
        vehicle.registration,
        vehicle.cap_id
    );

    let insurance_fut = gateway.insurance(&vehicle.cap_id);
    let history_fut = gateway.history_check(&reg);

    let (valuation, insurance, history) = match mileage {
        Some(miles) => {
            let valuation_fut = gateway.valuation(&vehicle.cap_id, miles, condition);
            let (v, i, h) = futures::join!(valuation_fut, insurance_fut, history_fut);
            (Some(v), i, h)
        }
        None => {
            let (i, h) = futures::join!(insurance_fut, history_fut);
            (None, i, h)
        }
    };

    Ok(assemble_report(vehicle, valuation, insurance, history))
}

/// Reduces the settled section outcomes into the report.
///
/// `valuation` is `None` when no valuation was attempted (mileage not
/// supplied); the output does not distinguish that from a failed one.
pub(crate) fn assemble_report(
    vehicle: CapVehicle,
    valuation: Option<Result<Valuation, DataError>>,
    insurance: Result<InsuranceDetails, DataError>,
    history: Result<HistoryCheck, DataError>,
) -> ComprehensiveReport {
    ComprehensiveReport {
        vehicle,
        valuation: valuation.and_then(|outcome| keep_section("valuation", outcome)),
        insurance: keep_section("insurance", insurance),
        history: keep_section("history", history),
    }
}

/// Keeps a successful section, logs and drops a failed one.
fn keep_section<T>(section: &str, outcome: Result<T, DataError>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Report section '{section}' omitted: {e}");
            None
        }
    }
}
