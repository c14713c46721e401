use super::*;
use shared::domain::{default_slides, IconSelectorError, IconVariant};

fn energy_deck() -> SlideDeck {
    SlideDeck::new(vec![
        Slide::with_icon("fas fa-sun"),
        Slide::with_icon("fas fa-wind"),
        Slide::with_icon("fas fa-water"),
    ])
}

fn sorted_classes(sync: &IconSynchronizer) -> Vec<String> {
    let mut classes = sync.icon().classes().to_vec();
    classes.sort();
    classes
}

#[test]
fn active_sun_slide_yields_only_sun_variant() {
    let mut deck = energy_deck();
    deck.activate(0);
    let mut sync = IconSynchronizer::new(IconElement::from_class_attr("fas fa-water"));

    let outcome = sync.update_icon(&deck);

    assert_eq!(outcome, SyncOutcome::Updated(IconVariant::Sun));
    let icon = sync.icon();
    assert!(icon.contains("fas"));
    assert!(icon.contains("fa-sun"));
    assert!(!icon.contains("fa-wind"));
    assert!(!icon.contains("fa-water"));
}

#[test]
fn update_is_idempotent_under_stable_active_slide() {
    let mut deck = energy_deck();
    deck.activate(1);
    let mut sync = IconSynchronizer::default();

    sync.update_icon(&deck);
    let once = sync.icon().clone();
    sync.update_icon(&deck);

    assert_eq!(sync.icon(), &once);
}

#[test]
fn no_active_slide_leaves_icon_untouched() {
    let deck = energy_deck();
    let mut sync = IconSynchronizer::new(IconElement::from_class_attr("fas fa-wind"));
    let before = sync.icon().clone();

    assert_eq!(sync.update_icon(&deck), SyncOutcome::NoActiveSlide);
    assert_eq!(sync.icon(), &before);
}

#[test]
fn slide_without_selector_leaves_icon_untouched() {
    let mut deck = SlideDeck::new(vec![Slide::without_icon()]);
    deck.activate(0);
    let mut sync = IconSynchronizer::new(IconElement::from_class_attr("fas fa-sun"));
    let before = sync.icon().clone();

    assert_eq!(sync.update_icon(&deck), SyncOutcome::MissingSelector);
    assert_eq!(sync.icon(), &before);
}

#[test]
fn malformed_selector_is_rejected_without_mutation() {
    let mut deck = SlideDeck::new(vec![Slide::with_icon("fa-sun"), Slide::with_icon("fas fa-fire")]);
    let mut sync = IconSynchronizer::new(IconElement::from_class_attr("fas fa-water"));
    let before = sync.icon().clone();

    deck.activate(0);
    assert_eq!(
        sync.update_icon(&deck),
        SyncOutcome::InvalidSelector(IconSelectorError::TokenCount("fa-sun".into()))
    );
    deck.activate(1);
    assert_eq!(
        sync.update_icon(&deck),
        SyncOutcome::InvalidSelector(IconSelectorError::UnknownVariant("fa-fire".into()))
    );
    assert_eq!(sync.icon(), &before);
}

#[test]
fn load_then_transition_follows_active_slide() {
    let mut deck = SlideDeck::from_specs(&default_slides());
    let mut sync = IconSynchronizer::default();

    assert!(sync.handle_event(PageEvent::Loaded, &deck).is_updated());
    assert_eq!(sorted_classes(&sync), ["fa-sun", "fas"]);

    deck.next();
    sync.handle_event(PageEvent::SlideTransitioned, &deck);
    assert_eq!(sorted_classes(&sync), ["fa-wind", "fas"]);
    assert!(!sync.icon().contains("fa-sun"));

    deck.next();
    sync.handle_event(PageEvent::SlideTransitioned, &deck);
    assert_eq!(sync.icon().variant(), Some(IconVariant::Water));
}

#[test]
fn unrelated_icon_classes_survive_synchronization() {
    let mut deck = energy_deck();
    deck.activate(2);
    let mut sync = IconSynchronizer::new(IconElement::from_class_attr("fas fa-sun fa-4x text-warning"));

    sync.update_icon(&deck);

    assert_eq!(sync.icon().class_attr(), "fas fa-4x text-warning fa-water");
}

#[test]
fn losing_the_active_slide_keeps_last_variant() {
    let mut deck = SlideDeck::from_specs(&default_slides());
    let mut sync = IconSynchronizer::default();
    deck.next();
    sync.handle_event(PageEvent::SlideTransitioned, &deck);
    let before = sync.icon().clone();

    deck.deactivate();
    assert_eq!(deck.active_index(), None);
    assert_eq!(
        sync.handle_event(PageEvent::SlideTransitioned, &deck),
        SyncOutcome::NoActiveSlide
    );
    assert_eq!(sync.icon(), &before);
    assert_eq!(sync.icon().variant(), Some(IconVariant::Wind));
}
