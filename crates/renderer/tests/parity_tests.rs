//! Both render paths and `color_at` checked against the shared parity table.
//!
//! The LUT used here is the identity ramp `[i, i, i, 255]`, so a pixel's red
//! channel is the LUT index the pipeline chose.

use overlay_common::{RasterGrid, RenderMode};
use projection::ViewTransform;
use renderer::OverlayContext;
use test_utils::{
    parity_row, small_bounds, ParityCase, GDAL_FLOAT_MIN, INEXACT_NO_DATA, PARITY_CASES,
};

fn index_ramp() -> Vec<u8> {
    (0..=255u8).flat_map(|i| [i, i, i, 255]).collect()
}

fn expected_pixel(case: &ParityCase) -> [u8; 4] {
    match case.index {
        Some(i) => [i, i, i, 255],
        None => [0, 0, 0, 0],
    }
}

fn context_for(case: &ParityCase, mode: RenderMode) -> OverlayContext {
    let mut context = OverlayContext::new(mode).unwrap();
    context.set_color_scale_lut(&index_ramp()).unwrap();
    context.set_domain(case.low, case.high).unwrap();
    context.set_clamp(case.clamp_low, Some(case.clamp_high));
    context.set_no_data_value(case.no_data);
    context
}

#[test]
fn test_color_at_matches_table() {
    for case in PARITY_CASES {
        let context = context_for(case, RenderMode::Sequential);
        assert_eq!(context.color_at(case.value), expected_pixel(case), "{}", case.name);
    }
}

#[test]
fn test_single_pixel_frames_match_table() {
    let bounds = small_bounds();
    let view = ViewTransform::fit_bounds(&bounds, 1, 1).unwrap();

    for mode in [RenderMode::Parallel, RenderMode::Sequential] {
        for case in PARITY_CASES {
            let mut context = context_for(case, mode);
            let grid = RasterGrid::new(1, 1, vec![case.value]).unwrap();
            context.set_data(grid, bounds).unwrap();

            let image = context.render(&view, 1, 1).unwrap();
            assert_eq!(
                image.get_pixel(0, 0).0,
                expected_pixel(case),
                "{} ({:?})",
                case.name,
                mode
            );
            assert_eq!(image.get_pixel(0, 0).0[3], case.alpha(), "{} alpha", case.name);
        }
    }
}

#[test]
fn test_parity_row_in_one_frame() {
    // Only the cases sharing the most common settings can share a frame.
    let reference = PARITY_CASES[2];
    let shared: Vec<_> = PARITY_CASES
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            c.low == reference.low
                && c.high == reference.high
                && c.clamp_low == reference.clamp_low
                && c.clamp_high == reference.clamp_high
                && c.no_data == reference.no_data
        })
        .collect();
    assert!(shared.len() >= 5);

    let grid = parity_row();
    let bounds = small_bounds();
    let view = ViewTransform::fit_bounds(&bounds, grid.width(), 1).unwrap();

    for mode in [RenderMode::Parallel, RenderMode::Sequential] {
        let mut context = context_for(&reference, mode);
        context.set_data(grid.clone(), bounds).unwrap();
        let image = context.render(&view, grid.width() as i64, 1).unwrap();

        for (x, case) in &shared {
            assert_eq!(
                image.get_pixel(*x as u32, 0).0,
                expected_pixel(case),
                "{} ({:?})",
                case.name,
                mode
            );
        }
    }
}

#[test]
fn test_grid_sentinel_compared_at_sample_precision() {
    let bounds = small_bounds();
    let view = ViewTransform::fit_bounds(&bounds, 1, 1).unwrap();

    for sentinel in [INEXACT_NO_DATA, GDAL_FLOAT_MIN] {
        for mode in [RenderMode::Parallel, RenderMode::Sequential] {
            let mut context = OverlayContext::new(mode).unwrap();
            context.set_clamp(true, Some(true));
            let grid = RasterGrid::new(1, 1, vec![sentinel as f32])
                .unwrap()
                .with_no_data(Some(sentinel));
            context.set_data(grid, bounds).unwrap();

            let image = context.render(&view, 1, 1).unwrap();
            assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0], "{} ({:?})", sentinel, mode);
        }
    }
}
