use crate::geometry::{Ball, Color, FloatType, WorldBox, WorldPoint};

/// Surface attributes shared by all primitives.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub albedo: Color,
    pub specular: Color,
    pub smoothness: FloatType,
    pub emission: Color,
}

impl Material {
    /// Non-metallic material with the given base color and no emission.
    pub fn dielectric(albedo: Color, specular: FloatType, smoothness: FloatType) -> Material {
        Material {
            albedo,
            specular: Color::repeat(specular),
            smoothness,
            emission: Color::zeros(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub ball: Ball,
    pub material: Material,
}

impl Sphere {
    pub fn center(&self) -> WorldPoint {
        self.ball.center
    }

    pub fn radius(&self) -> FloatType {
        self.ball.radius
    }

    pub fn bounding_box(&self) -> WorldBox {
        self.ball.bounding_box()
    }
}

/// Axis aligned box primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cube {
    pub bounds: WorldBox,
    pub material: Material,
}

impl Cube {
    pub fn bounding_box(&self) -> WorldBox {
        self.bounds
    }
}

/// Converts a color from HSV (all components in [0, 1]) to RGB.
pub fn hsv_to_rgb(hue: FloatType, saturation: FloatType, value: FloatType) -> Color {
    let h = hue.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;

    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    match sector as u32 {
        0 => Color::new(value, t, p),
        1 => Color::new(q, value, p),
        2 => Color::new(p, value, t),
        3 => Color::new(p, q, value),
        4 => Color::new(t, p, value),
        _ => Color::new(value, p, q),
    }
}
