use proptest::prelude::*;

pub(crate) fn number_strategy() -> impl Strategy<Value = String> {
    (0u8..=20).prop_map(|n| n.to_string())
}

pub(crate) fn dice_strategy() -> impl Strategy<Value = String> {
    (prop::option::of(1u8..=3), 1u8..=8).prop_map(|(count, sides)| match count {
        Some(count) => format!("{}d{}", count, sides),
        None => format!("d{}", sides),
    })
}

pub(crate) fn drop_strategy() -> impl Strategy<Value = String> {
    (
        1u8..=3,
        1u8..=6,
        prop_oneof!["highest", "lowest"],
        prop::option::of(1u8..=3),
    )
        .prop_map(|(count, sides, extreme, n)| match n {
            Some(n) => format!("{}d{} drop {}{}", count, sides, extreme, n),
            None => format!("{}d{} drop {}", count, sides, extreme),
        })
}

pub(crate) fn advantage_strategy(
    inner: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    (prop_oneof!["adv", "dadv"], inner).prop_map(|(word, expr)| format!("{} ({})", word, expr))
}

pub(crate) fn parenthesized_strategy(
    inner: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    inner.prop_map(|expr| format!("({})", expr))
}

/// Division is left out so that no generated expression can divide by zero.
pub(crate) fn binary_operation_strategy(
    left: impl Strategy<Value = String>,
    right: impl Strategy<Value = String>,
) -> impl Strategy<Value = String> {
    (left, prop_oneof![Just("+"), Just("-"), Just("*")], right)
        .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r))
}

pub(crate) fn dice_expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![number_strategy(), dice_strategy(), drop_strategy()];

    leaf.prop_recursive(3, 8, 2, |inner| {
        prop_oneof![
            parenthesized_strategy(inner.clone()),
            advantage_strategy(inner.clone()),
            binary_operation_strategy(inner.clone(), inner),
        ]
    })
}
