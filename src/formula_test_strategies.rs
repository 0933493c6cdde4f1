use proptest::prelude::*;

pub(crate) fn number_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u16..=100).prop_map(|n| n.to_string()),
        (0u16..=100, 1u8..=99).prop_map(|(n, frac)| format!("{}.{}", n, frac)),
    ]
}

/// Dice small enough that a handful of them stays under the distribution limits.
pub(crate) fn small_dice_strategy() -> impl Strategy<Value = String> {
    (1u8..=3, 1u8..=12).prop_map(|(count, sides)| format!("{}d{}", count, sides))
}

pub(crate) fn dice_strategy() -> impl Strategy<Value = String> {
    (prop::option::of(1u16..=100), 1u16..=1000).prop_map(|(count, sides)| match count {
        Some(count) => format!("{}d{}", count, sides),
        None => format!("d{}", sides),
    })
}

pub(crate) fn parenthesized_strategy(
    inner: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    inner.prop_map(|expr| format!("({})", expr))
}

pub(crate) fn negated_strategy(inner: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    inner.prop_map(|expr| format!("(-{})", expr))
}

pub(crate) fn binary_operation_strategy(
    left: impl Strategy<Value = String>,
    right: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    (
        left,
        prop_oneof![Just("+"), Just("-"), Just("*"), Just("/")],
        right,
    )
        .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r))
}

fn formula_from(leaf: BoxedStrategy<String>) -> impl Strategy<Value = String> {
    leaf.prop_recursive(4, 24, 6, |inner| {
        prop_oneof![
            parenthesized_strategy(inner.clone()),
            negated_strategy(parenthesized_strategy(inner.clone())),
            binary_operation_strategy(inner.clone(), inner),
        ]
    })
}

/// Well-formed formulas of any size.
pub(crate) fn formula_strategy() -> impl Strategy<Value = String> {
    formula_from(prop_oneof![number_strategy(), dice_strategy()].boxed())
}

/// Well-formed formulas whose dice are all small.
pub(crate) fn small_formula_strategy() -> impl Strategy<Value = String> {
    formula_from(prop_oneof![number_strategy(), small_dice_strategy()].boxed())
}

/// `NdS` optionally followed by a constant modifier.
pub(crate) fn dice_with_modifier_strategy() -> impl Strategy<Value = String> {
    (
        small_dice_strategy(),
        prop::option::of((prop_oneof![Just("+"), Just("-")], 0u16..=50)),
    )
        .prop_map(|(dice, modifier)| match modifier {
            Some((op, n)) => format!("{}{}{}", dice, op, n),
            None => dice,
        })
}
