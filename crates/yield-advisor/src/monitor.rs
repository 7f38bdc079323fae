//! Position Monitor
//!
//! Stateless threshold rules; every position is checked against each rule
//! independently, so one position can raise several alerts.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{Alert, AlertKind, Position, Severity};

/// Impermanent loss above this raises `HIGH_IL`, percent
pub const HIGH_IL_THRESHOLD: Decimal = dec!(5);

/// Current APY below this raises `LOW_APY`, percent
pub const LOW_APY_THRESHOLD: Decimal = dec!(5);

/// Health factor below this raises `LIQUIDATION_RISK`
pub const LIQUIDATION_HEALTH_FACTOR: Decimal = dec!(1.5);

/// Alerts for all positions, in position order
pub fn monitor_positions(positions: &[Position]) -> Vec<Alert> {
    positions.iter().flat_map(check_position).collect()
}

fn check_position(position: &Position) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let il = position.il_percentage();
    if il > HIGH_IL_THRESHOLD {
        alerts.push(alert(
            position,
            AlertKind::HighIl,
            Severity::Warning,
            format!("High impermanent loss detected: {il}%"),
            "Consider rebalancing or exiting position",
        ));
    }

    let apy = position.current_apy();
    if apy < LOW_APY_THRESHOLD {
        alerts.push(alert(
            position,
            AlertKind::LowApy,
            Severity::Info,
            format!("Low APY detected: {apy}%"),
            "Consider migrating to higher yield opportunity",
        ));
    }

    let health_factor = position.health_factor();
    if health_factor < LIQUIDATION_HEALTH_FACTOR {
        alerts.push(alert(
            position,
            AlertKind::LiquidationRisk,
            Severity::Critical,
            format!("Liquidation risk! Health factor: {health_factor}"),
            "Add collateral immediately or reduce debt",
        ));
    }

    alerts
}

fn alert(position: &Position, kind: AlertKind, severity: Severity, message: String, action: &str) -> Alert {
    Alert {
        kind,
        severity,
        position_id: position.id.clone(),
        message,
        action: action.to_string(),
    }
}
