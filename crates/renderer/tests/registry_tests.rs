//! Dataset registry behaviour through the context, including texture accounting.

use overlay_common::{OverlayError, RenderMode};
use projection::ViewTransform;
use renderer::OverlayContext;
use test_utils::{create_ramp_grid, create_temperature_grid, small_bounds};

#[test]
fn test_duplicate_then_remove() {
    let mut context = OverlayContext::new(RenderMode::Sequential).unwrap();
    context
        .add_dataset("a", create_ramp_grid(4, 4), small_bounds())
        .unwrap();
    let err = context
        .add_dataset("a", create_ramp_grid(4, 4), small_bounds())
        .unwrap_err();
    assert_eq!(err, OverlayError::DuplicateId("a".to_string()));

    context.remove_dataset("a").unwrap();
    assert!(!context.dataset_available("a"));
    assert_eq!(context.remove_dataset("a").unwrap_err().kind(), "UnknownId");
}

#[test]
fn test_first_named_dataset_renders_without_selection() {
    let bounds = small_bounds();
    let view = ViewTransform::fit_bounds(&bounds, 4, 4).unwrap();

    for mode in [RenderMode::Parallel, RenderMode::Sequential] {
        let mut context = OverlayContext::new(mode).unwrap();
        assert_eq!(context.render(&view, 4, 4).unwrap_err(), OverlayError::NoDataset);

        context
            .add_dataset("a", create_ramp_grid(4, 4), bounds)
            .unwrap();
        context
            .add_dataset("b", create_ramp_grid(8, 8), bounds)
            .unwrap();
        assert_eq!(context.data().unwrap().width(), 4, "{:?}", mode);
        assert_eq!(context.render(&view, 4, 4).unwrap().dimensions(), (4, 4));

        context.set_current_dataset("b").unwrap();
        assert_eq!(context.data().unwrap().width(), 8);
    }
}

#[test]
fn test_removing_other_dataset_keeps_current() {
    let mut context = OverlayContext::new(RenderMode::Sequential).unwrap();
    context
        .add_dataset("a", create_ramp_grid(4, 4), small_bounds())
        .unwrap();
    context
        .add_dataset("b", create_ramp_grid(8, 8), small_bounds())
        .unwrap();
    context.set_current_dataset("b").unwrap();
    context.remove_dataset("a").unwrap();
    assert_eq!(context.data().unwrap().width(), 8);
    assert_eq!(context.datasets().ids(), vec!["b"]);
}

#[test]
fn test_no_texture_leak_across_replacement() {
    let mut context = OverlayContext::new(RenderMode::Parallel).unwrap();
    assert_eq!(context.live_textures(), (0, 1));

    for size in [4, 8, 16, 32] {
        context
            .set_data(create_temperature_grid(size, size), small_bounds())
            .unwrap();
        assert_eq!(context.live_textures().0, 1, "after {}x{}", size, size);
    }

    context
        .add_dataset("a", create_ramp_grid(4, 4), small_bounds())
        .unwrap();
    context
        .add_dataset("b", create_ramp_grid(4, 4), small_bounds())
        .unwrap();
    assert_eq!(context.live_textures().0, 3);

    context.set_current_dataset("a").unwrap();
    assert_eq!(context.live_textures().0, 2);

    context.remove_dataset("a").unwrap();
    context.remove_dataset("b").unwrap();
    assert_eq!(context.live_textures().0, 0);

    for name in ["viridis", "hot", "jet", "greys"] {
        context.set_color_scale(name).unwrap();
    }
    assert_eq!(context.live_textures().1, 1);
}

#[test]
fn test_sequential_mode_allocates_no_textures() {
    let mut context = OverlayContext::new(RenderMode::Sequential).unwrap();
    context
        .set_data(create_ramp_grid(4, 4), small_bounds())
        .unwrap();
    assert_eq!(context.live_textures(), (0, 0));
    assert!(context.datasets().current().unwrap().texture().is_none());
}
