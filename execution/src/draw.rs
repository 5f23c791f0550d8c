//! Winner selection.
//!
//! Normal rounds pick one item by weight. Jackpot rounds pick one of the two groups with equal
//! probability and ignore item weights entirely.

use luckyeight_types::{Group, Item, RoundType, Winner, ITEM_COUNT};
use rand::Rng;

use crate::GameConfig;

/// Weighted pick over all items in fixed iteration order.
///
/// Draws a uniform value in `[0, total)` and subtracts weights item by item until the remainder
/// reaches zero. The last item is the fallback for floating-point drift. Items with zero weight
/// never win.
pub fn draw_item<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> Item {
    let total: f64 = Item::ALL.into_iter().map(|item| config.weight(item)).sum();
    if total <= 0.0 {
        return Item::ALL[rng.gen_range(0..ITEM_COUNT)];
    }

    let mut remainder = rng.gen::<f64>() * total;
    for item in Item::ALL {
        let weight = config.weight(item);
        if weight == 0.0 {
            continue;
        }
        remainder -= weight;
        if remainder <= 0.0 {
            return item;
        }
    }
    Item::ALL[ITEM_COUNT - 1]
}

/// Fair coin between the two groups.
pub fn draw_group<R: Rng + ?Sized>(rng: &mut R) -> Group {
    if rng.gen_bool(0.5) {
        Group::Salad
    } else {
        Group::Grill
    }
}

/// Draw the winner for a round of the given type.
pub fn draw<R: Rng + ?Sized>(rng: &mut R, round_type: RoundType, config: &GameConfig) -> Winner {
    match round_type {
        RoundType::Normal => Winner::Item(draw_item(rng, config)),
        RoundType::Jackpot => Winner::Group(draw_group(rng)),
    }
}
