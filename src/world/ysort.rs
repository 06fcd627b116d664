use bevy::prelude::*;
use crate::shared::*;

/// Z distance between two draw layers.
pub const LAYER_DEPTH: f32 = 50.0;
/// Z per pixel of rect-centre Y inside one layer.
const Y_SORT_SCALE: f32 = 0.001;

/// Draw depth: layer first, then lower rect centres draw over higher ones.
/// The in-layer offset is clamped so it never reaches the next layer.
pub fn draw_depth(layer: Layer, center_y: f32) -> f32 {
    let within = (center_y * Y_SORT_SCALE).clamp(0.0, LAYER_DEPTH - 1.0);
    layer.index() as f32 * LAYER_DEPTH + within
}

/// Bounds + Layer → Transform (and sprite size), every frame.
///
/// Map space is Y-down; Bevy translation is Y-up, so `y` is negated here and
/// nowhere else.
pub fn sync_world_transforms(
    mut query: Query<(&Bounds, &Layer, &mut Transform, Option<&mut Sprite>)>,
) {
    for (bounds, layer, mut transform, sprite) in &mut query {
        let center = bounds.0.center();
        let next = Vec3::new(center.x, -center.y, draw_depth(*layer, center.y));
        if transform.translation != next {
            transform.translation = next;
        }
        if let Some(mut sprite) = sprite {
            let size = Some(bounds.0.size());
            if sprite.custom_size != size {
                sprite.custom_size = size;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_dominates_y() {
        // Deep in the map but on a lower layer still draws below.
        assert!(draw_depth(Layer::Ground, 48_000.0) < draw_depth(Layer::Soil, 0.0));
        assert!(draw_depth(Layer::HouseTop, 0.0) > draw_depth(Layer::Main, 10_000.0));
    }

    #[test]
    fn test_lower_rects_draw_on_top_in_layer() {
        let back = draw_depth(Layer::Main, 100.0);
        let front = draw_depth(Layer::Main, 400.0);
        assert!(front > back);
    }

    #[test]
    fn test_depth_sorting_matches_layer_then_y() {
        let entries = [
            (Layer::Main, 300.0),
            (Layer::Ground, 10.0),
            (Layer::Main, 100.0),
            (Layer::RainDrops, 0.0),
            (Layer::Soil, 900.0),
        ];
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|a, b| {
            let (la, ya) = entries[*a];
            let (lb, yb) = entries[*b];
            draw_depth(la, ya).total_cmp(&draw_depth(lb, yb))
        });
        assert_eq!(order, vec![1, 4, 2, 0, 3]);
    }
}
