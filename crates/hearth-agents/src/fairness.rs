//! Fehr–Schmidt inequality-aversion utility.
//!
//! The planner scores every (agent, execution) pair with this utility to
//! build the daily inequality index, and the cognition layer uses the
//! same shape when turning reward shares into norm-alignment signals.

/// Fehr–Schmidt utility of receiving `own` while `others` received their
/// respective shares.
///
/// `own - alpha * mean(max(o - own, 0)) - beta * mean(max(own - o, 0))`.
///
/// `alpha` weighs envy (earning less than others), `beta` weighs guilt
/// (earning more). With no others, or when everyone received the same
/// share, the utility is exactly `own`.
pub fn fehr_schmidt_utility(own: f64, others: &[f64], alpha: f64, beta: f64) -> f64 {
    if others.is_empty() {
        return own;
    }
    let n = others.len() as f64;
    let envy: f64 = others.iter().map(|o| (o - own).max(0.0)).sum::<f64>() / n;
    let guilt: f64 = others.iter().map(|o| (own - o).max(0.0)).sum::<f64>() / n;
    own - alpha * envy - beta * guilt
}
