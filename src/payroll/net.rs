use crate::model::PayrollFigures;

pub fn total_received(base_salary: f64, bonus: f64) -> f64 {
    base_salary + bonus
}

pub fn net_total(f: &PayrollFigures) -> f64 {
    f.total_received + f.overtime - f.transport_deduction - f.loan_deduction - f.other_deduction
}

/// Refreshes the derived totals. `cash_payment` is left as entered.
pub fn recompute(figures: &mut PayrollFigures) {
    figures.total_received = total_received(figures.base_salary, figures.bonus);
    figures.net_total = net_total(figures);
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
