use valuation_core::ChecklistItem;

/// One row of a declarative checklist: label, predicate and value formatter.
pub(crate) struct Rule<C> {
    pub name: &'static str,
    pub description: &'static str,
    pub passes: fn(&C) -> bool,
    pub value: fn(&C) -> String,
}

impl<C> Rule<C> {
    fn evaluate(&self, ctx: &C) -> ChecklistItem {
        ChecklistItem {
            name: self.name.to_string(),
            pass: (self.passes)(ctx),
            value: (self.value)(ctx),
            description: self.description.to_string(),
        }
    }
}

/// Evaluate every rule once, preserving table order.
pub(crate) fn evaluate_all<C>(rules: &[Rule<C>], ctx: &C) -> Vec<ChecklistItem> {
    rules.iter().map(|rule| rule.evaluate(ctx)).collect()
}

pub(crate) fn count_passed(items: &[ChecklistItem]) -> u32 {
    items.iter().filter(|item| item.pass).count() as u32
}
