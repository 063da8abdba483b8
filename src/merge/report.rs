//! Success messages for completed writes.

use super::writer::{TargetMode, Touched};

/// Returns one message per touched object, sorted ascending.
///
/// Sorting makes the result independent of collection and match order.
pub fn summarize(mode: TargetMode, touched: &[Touched]) -> Vec<String> {
    let mut msgs: Vec<String> = match mode {
        TargetMode::CreateNamedResources | TargetMode::PatchNamedResources => touched
            .iter()
            .map(|t| format!("created resource \"{}\"", t.identity))
            .collect(),
        TargetMode::PatchDesiredResources => touched
            .iter()
            .map(|t| format!("updated resource \"{}\"", t.identity))
            .collect(),
        TargetMode::CompositeResource => touched
            .first()
            .map(|t| vec![format!("updated xr \"{}\"", t.identity)])
            .unwrap_or_default(),
    };
    msgs.sort();
    msgs
}
