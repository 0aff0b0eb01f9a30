//! Tests for series coloring.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread;

use proptest::prelude::*;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use super::*;

fn hex(packed: u32) -> String {
    RgbColor::from_packed(packed).to_hex(HexStyle::Unpadded)
}

/// Allocates `count` throwaway keys and returns the color of the next one.
fn color_after(count: usize) -> String {
    let mut colors = ColorSequence::<usize>::new();
    for i in 0..count {
        colors.color_for(&i);
    }
    colors.color_for(&count)
}

#[test]
fn test_first_key_is_chameleon() {
    let mut colors: ColorSequence = ColorSequence::new();
    assert_eq!(colors.color_for("first"), "#8ae234");
}

#[test]
fn test_same_key_same_color() {
    let mut colors: ColorSequence = ColorSequence::new();
    let a = colors.color_for("a");
    assert_eq!(colors.color_for("a"), a);
    colors.color_for("b");
    colors.color_for("c");
    assert_eq!(colors.color_for("a"), a);
    assert_eq!(colors.assignment_count(), 3);
}

#[test]
fn test_first_ten_follow_palettes() {
    let mut colors = ColorSequence::<usize>::new();
    let got: Vec<String> = (0..10).map(|i| colors.color_for(&i)).collect();

    let expected: Vec<String> = TANGO_LIGHT
        .iter()
        .chain(TANGO_DARK.iter())
        .map(|c| c.to_hex(HexStyle::Unpadded))
        .collect();
    assert_eq!(got, expected);

    let mut unique = got.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 10);
}

#[test]
fn test_color_depends_on_arrival_order() {
    let mut colors: ColorSequence = ColorSequence::new();
    colors.color_for("x");
    colors.color_for("y");
    assert_eq!(colors.get("x"), Some(TANGO_LIGHT[0]));

    colors.reset();
    colors.color_for("y");
    colors.color_for("x");
    assert_eq!(colors.get("y"), Some(TANGO_LIGHT[0]));
    assert_eq!(colors.get("x"), Some(TANGO_LIGHT[1]));
}

#[test]
fn test_reset_starts_over() {
    let mut colors: ColorSequence = ColorSequence::new();
    colors.color_for("a");
    colors.color_for("b");
    colors.reset();
    assert!(colors.is_empty());
    assert_eq!(colors.get("a"), None);
    assert_eq!(colors.color_for("b"), "#8ae234");
}

#[test]
fn test_boundaries() {
    assert_eq!(color_after(0), hex(0x8AE234));
    assert_eq!(color_after(5), hex(0x73D216));
    assert_eq!(color_after(4), hex(0xAD7FA8));
    assert_eq!(color_after(9), hex(0x75507B));
}

#[test]
fn test_blend_fractions_for_tiers() {
    let fractions: Vec<(u64, u64)> = (0..7)
        .map(BlendFraction::for_blend_tier)
        .map(|f| (f.numerator, f.denominator))
        .collect();
    assert_eq!(
        fractions,
        vec![(1, 2), (1, 4), (3, 4), (1, 8), (3, 8), (5, 8), (7, 8)]
    );
    assert_eq!(BlendFraction::for_blend_tier(7).denominator, 16);
}

#[test]
fn test_blend_fraction_at_deepest_tier() {
    let f = BlendFraction::for_blend_tier((1 << 63) - 2);
    assert_eq!((f.numerator, f.denominator), ((1 << 63) - 1, 1 << 63));

    // Deepest tier a sequence index can reach.
    let deepest = (usize::MAX / PALETTE_SIZE - 2) as u64;
    let f = BlendFraction::for_blend_tier(deepest);
    assert!(f.numerator % 2 == 1 && f.numerator < f.denominator);
}

#[test]
fn test_blended_colors_at_pinned_counts() {
    // Sky blue: floor 0x3465A4, ceiling 0x729FCF.
    // Count 12 is tier 2 (1/2), 17 is tier 3 (1/4), 22 is tier 4 (3/4).
    assert_eq!(color_after(12), "#5382b9");
    assert_eq!(color_after(17), "#4373ae");
    assert_eq!(color_after(22), "#6290c4");
    // Chameleon at 1/2.
    assert_eq!(color_after(10), "#7eda25");
}

#[test]
fn test_blend_matches_channel_formula() {
    let floor = RgbColor::from_packed(0x3465A4);
    let ceil = RgbColor::from_packed(0x729FCF);
    for t in 0..20 {
        let fraction = BlendFraction::for_blend_tier(t);
        let blended = RgbColor::blend(floor, ceil, fraction);
        let f = fraction.as_f64();
        let channel = |lo: u8, hi: u8| lo + (f * f64::from(hi - lo)).floor() as u8;
        assert_eq!(blended.red(), channel(floor.red(), ceil.red()));
        assert_eq!(blended.green(), channel(floor.green(), ceil.green()));
        assert_eq!(blended.blue(), channel(floor.blue(), ceil.blue()));
    }
}

#[test]
fn test_blended_colors_stay_between_floor_and_ceiling() {
    let colors = ColorSequence::<usize>::new();
    for index in 10..200 {
        let c = colors.color_at(index);
        let i = index % PALETTE_SIZE;
        let (lo, hi) = (TANGO_DARK[i], TANGO_LIGHT[i]);
        assert!((lo.red()..=hi.red()).contains(&c.red()));
        assert!((lo.green()..=hi.green()).contains(&c.green()));
        assert!((lo.blue()..=hi.blue()).contains(&c.blue()));
    }
}

#[test]
fn test_unpadded_hex_is_kept() {
    let low = RgbColor::from_packed(0x012345);
    let mut colors: ColorSequence = ColorSequence::with_palettes([low; 5], TANGO_DARK);
    assert_eq!(colors.color_for("a"), "#12345");

    let mut padded: ColorSequence =
        ColorSequence::with_palettes([low; 5], TANGO_DARK).with_hex_style(HexStyle::Padded);
    assert_eq!(padded.color_for("a"), "#012345");
}

#[test]
fn test_parse_hex() {
    assert_eq!(RgbColor::parse_hex("#8AE234"), Some(TANGO_LIGHT[0]));
    assert_eq!(RgbColor::parse_hex("8ae234"), Some(TANGO_LIGHT[0]));
    assert_eq!(RgbColor::parse_hex("0x73D216"), Some(TANGO_DARK[0]));
    assert_eq!(RgbColor::parse_hex("#1000000"), None);
    assert_eq!(RgbColor::parse_hex("#+12345"), None);
    assert_eq!(RgbColor::parse_hex("zzz"), None);
    assert_eq!(RgbColor::parse_hex(""), None);
}

#[test]
fn test_channels() {
    let c = RgbColor::from_rgb(0x12, 0x34, 0x56);
    assert_eq!(c.packed(), 0x123456);
    assert_eq!((c.red(), c.green(), c.blue()), (0x12, 0x34, 0x56));
    assert_eq!(c.to_string(), "#123456");
}

#[test]
fn test_assignments_keep_first_seen_order() {
    let mut colors: ColorSequence = ColorSequence::new();
    for key in ["tabu", "hill", "late", "hill"] {
        colors.color_for(key);
    }
    let keys: Vec<&str> = colors.assignments().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["tabu", "hill", "late"]);

    let hexes: Vec<String> = colors.hex_assignments().map(|(_, h)| h).collect();
    assert_eq!(hexes, vec!["#8ae234", "#fce94f", "#729fcf"]);
}

#[test]
fn test_shared_sequence_races_agree() {
    let shared = Arc::new(SharedColorSequence::<String>::default());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                (0..20)
                    .map(|i| shared.color_for(format!("series-{i}").as_str()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for other in &results[1..] {
        assert_eq!(other, &results[0]);
    }
    assert_eq!(shared.assignment_count(), 20);

    shared.reset();
    assert_eq!(shared.assignment_count(), 0);
}

/// Collects the `color` field of every event.
struct ColorFields(Arc<Mutex<Vec<String>>>);

struct ColorVisitor<'a>(&'a mut Vec<String>);

impl Visit for ColorVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "color" {
            self.0.push(format!("{:?}", value));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for ColorFields {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut seen = self.0.lock().unwrap();
        event.record(&mut ColorVisitor(&mut seen));
    }
}

#[test]
fn test_assignment_event_uses_hex_style() {
    let mut light = TANGO_LIGHT;
    light[0] = RgbColor::from_packed(0x012345);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(ColorFields(Arc::clone(&seen)));

    let returned = tracing::subscriber::with_default(subscriber, || {
        let mut colors: ColorSequence =
            ColorSequence::with_palettes(light, TANGO_DARK).with_hex_style(HexStyle::Padded);
        let first = colors.color_for("a");
        colors.color_for("a");
        first
    });

    assert_eq!(returned, "#012345");
    assert_eq!(*seen.lock().unwrap(), vec!["#012345".to_string()]);
}

proptest! {
    #[test]
    fn prop_lookup_is_idempotent(keys in prop::collection::vec("[a-d]{1,3}", 1..40)) {
        let mut colors: ColorSequence = ColorSequence::new();
        for key in &keys {
            let first = colors.color_for(key.as_str());
            prop_assert_eq!(colors.color_for(key.as_str()), first);
        }
    }

    #[test]
    fn prop_count_equals_distinct_keys(keys in prop::collection::vec(0u16..50, 0..100)) {
        let mut colors = ColorSequence::<u16>::new();
        for key in &keys {
            colors.color_for(key);
        }
        let mut distinct = keys.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(colors.assignment_count(), distinct.len());
    }

    #[test]
    fn prop_color_is_function_of_index(index in 0usize..10_000) {
        let colors = ColorSequence::<u8>::new();
        prop_assert_eq!(colors.color_at(index), sequence_color(&TANGO_LIGHT, &TANGO_DARK, index));
    }
}
