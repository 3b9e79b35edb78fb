use rand::Rng;
use serde::Serialize;

use super::{DecorationSpec, Design};

/// How many pieces a `scattered` token draws.
pub const SCATTER_COUNT: usize = 12;

const EDGE: f32 = 4.0;
const FAR_EDGE: f32 = 96.0;

/// One concrete decoration on the page, in percent of the viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub color: String,
    pub size: u32,
    pub rotation: i32,
}

fn fixed(x: f32, y: f32, color: &str, size: u32, rotation: i32) -> Placement {
    Placement {
        x,
        y,
        color: color.to_string(),
        size,
        rotation,
    }
}

/// Expand a symbolic position token into placements.
///
/// `scattered` is drawn from `rng`; pass a seeded generator when the output
/// has to be reproducible. Unknown tokens expand to nothing.
pub fn expand_position<R: Rng>(
    token: &str,
    color: &str,
    size: u32,
    rng: &mut R,
) -> Vec<Placement> {
    match token {
        "top-left" => vec![fixed(EDGE, EDGE, color, size, 0)],
        "top-right" => vec![fixed(FAR_EDGE, EDGE, color, size, 90)],
        "bottom-left" => vec![fixed(EDGE, FAR_EDGE, color, size, 270)],
        "bottom-right" => vec![fixed(FAR_EDGE, FAR_EDGE, color, size, 180)],
        "top-center" => vec![fixed(50.0, EDGE, color, size, 0)],
        "bottom-center" => vec![fixed(50.0, FAR_EDGE, color, size, 180)],
        "left-center" => vec![fixed(EDGE, 50.0, color, size, 270)],
        "right-center" => vec![fixed(FAR_EDGE, 50.0, color, size, 90)],
        "all-corners" => ["top-left", "top-right", "bottom-left", "bottom-right"]
            .iter()
            .flat_map(|t| expand_position(t, color, size, &mut *rng))
            .collect(),
        "sides" => ["left-center", "right-center"]
            .iter()
            .flat_map(|t| expand_position(t, color, size, &mut *rng))
            .collect(),
        "scattered" => (0..SCATTER_COUNT)
            .map(|_| {
                let scale: f32 = rng.gen_range(0.5..1.2);
                Placement {
                    x: rng.gen_range(5.0..95.0),
                    y: rng.gen_range(5.0..95.0),
                    color: color.to_string(),
                    size: ((size as f32) * scale).round().max(1.0) as u32,
                    rotation: rng.gen_range(-45..=45),
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// All placements for one decoration kind of a design.
pub fn expand_spec<R: Rng>(spec: &DecorationSpec, size: u32, rng: &mut R) -> Vec<Placement> {
    if !spec.enabled {
        return Vec::new();
    }
    spec.positions
        .iter()
        .flat_map(|token| expand_position(token, spec.color, size, &mut *rng))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Texture,
    Overlay,
    Base,
}

/// One CSS background layer, topmost first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundLayer {
    pub kind: LayerKind,
    pub css: String,
    pub opacity: f32,
}

pub fn background_layers(design: &Design) -> Vec<BackgroundLayer> {
    let mut layers = Vec::new();
    if let Some(texture) = &design.texture {
        layers.push(BackgroundLayer {
            kind: LayerKind::Texture,
            css: format!("url(\"{}\")", svg_data_uri(texture.svg)),
            opacity: texture.opacity,
        });
    }
    if let Some(overlay) = design.background.overlay {
        layers.push(BackgroundLayer {
            kind: LayerKind::Overlay,
            css: overlay.to_string(),
            opacity: 1.0,
        });
    }
    layers.push(BackgroundLayer {
        kind: LayerKind::Base,
        css: design.background.base.to_string(),
        opacity: 1.0,
    });
    layers
}

fn svg_data_uri(svg: &str) -> String {
    let encoded = svg
        .replace('%', "%25")
        .replace('"', "'")
        .replace('#', "%23")
        .replace('<', "%3C")
        .replace('>', "%3E");
    format!("data:image/svg+xml,{}", encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_all_corners_expands_to_four() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = expand_position("all-corners", "#fff", 40, &mut rng);
        assert_eq!(p.len(), 4);
        assert!(p.iter().all(|pl| pl.size == 40));
    }

    #[test]
    fn test_scattered_is_reproducible_with_seed() {
        let a = expand_position("scattered", "#f00", 30, &mut StdRng::seed_from_u64(42));
        let b = expand_position("scattered", "#f00", 30, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.len(), SCATTER_COUNT);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (5.0..95.0).contains(&p.x) && (5.0..95.0).contains(&p.y)));
    }

    #[test]
    fn test_unknown_token_is_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(expand_position("everywhere", "#000", 10, &mut rng).is_empty());
    }

    #[test]
    fn test_texture_layer_is_topmost() {
        let design = crate::designs::design_by_id("marriage-temple-gold").unwrap();
        let layers = background_layers(design);
        assert_eq!(layers.first().map(|l| l.kind), Some(LayerKind::Texture));
        assert_eq!(layers.last().map(|l| l.kind), Some(LayerKind::Base));
        assert!(!layers[0].css.contains('#'));
    }
}
