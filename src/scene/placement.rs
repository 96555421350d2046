//! Collision-free procedural placement of spheres and cubes.
//!
//! Candidates are drawn once each and dropped if they overlap anything already
//! placed, so the final counts can be lower than requested.

use std::ops::RangeInclusive;

use bon::bon;
use log::{debug, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution as _, UnitDisc};
use thiserror::Error;

use crate::geometry::{Ball, Color, FloatType, Intersects, WorldBox, WorldPoint, WorldVector};

use super::primitives::{Cube, Material, Sphere, hsv_to_rgb};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlacementError {
    #[error("Invalid {what} range: max {max} is less than min {min}")]
    InvalidRange {
        what: &'static str,
        min: FloatType,
        max: FloatType,
    },

    #[error("Invalid {what} range: bounds must be finite, got {min} - {max}")]
    NonFiniteRange {
        what: &'static str,
        min: FloatType,
        max: FloatType,
    },

    #[error("{what} must be positive, got {value}")]
    NonPositiveSize { what: &'static str, value: FloatType },

    #[error("Placement radius must be finite and non-negative, got {0}")]
    InvalidPlacementRadius(FloatType),

    #[error("{what} probability must be within [0, 1], got {value}")]
    InvalidProbability { what: &'static str, value: FloatType },
}

/// How surface attributes of generated primitives are drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSettings {
    pub metal_probability: FloatType,
    /// Smoothness range of non-metals, metals are always rough.
    pub dielectric_smoothness: RangeInclusive<FloatType>,
    /// Specular reflectance of non-metals, on all channels.
    pub dielectric_specular: FloatType,
    /// Probability that a primitive emits light of its albedo color.
    pub emission_probability: FloatType,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        MaterialSettings {
            metal_probability: 0.5,
            dielectric_smoothness: 0.5..=1.0,
            dielectric_specular: 0.04,
            emission_probability: 1.0,
        }
    }
}

impl MaterialSettings {
    fn validate(&self) -> Result<(), PlacementError> {
        check_probability("metal", self.metal_probability)?;
        check_probability("emission", self.emission_probability)?;
        check_range("dielectric smoothness", &self.dielectric_smoothness)?;
        Ok(())
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Material {
        let color = hsv_to_rgb(rng.random(), rng.random(), rng.random());
        let metal = rng.random_bool(self.metal_probability.into());

        let (albedo, specular, smoothness) = if metal {
            (Color::zeros(), color, 0.0)
        } else {
            (
                color,
                Color::repeat(self.dielectric_specular),
                rng.random_range(self.dielectric_smoothness.clone()),
            )
        };

        let emission = if rng.random_bool(self.emission_probability.into()) {
            albedo
        } else {
            Color::zeros()
        };

        Material {
            albedo,
            specular,
            smoothness,
            emission,
        }
    }
}

/// Validated input of the placement sampler.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementSettings {
    seed: u64,
    placement_radius: FloatType,
    sphere_count: usize,
    sphere_radius: RangeInclusive<FloatType>,
    cube_count: usize,
    cube_min_size: WorldVector,
    cube_max_size: WorldVector,
    material: MaterialSettings,
}

#[bon]
impl PlacementSettings {
    #[builder]
    pub fn new(
        #[builder(default = 1_223_832_719)] seed: u64,
        #[builder(default = 100.0)] placement_radius: FloatType,
        #[builder(default = 10)] sphere_count: usize,
        #[builder(default = 5.0..=30.0)] sphere_radius: RangeInclusive<FloatType>,
        #[builder(default = 10)] cube_count: usize,
        #[builder(default = WorldVector::repeat(1.0))] cube_min_size: WorldVector,
        #[builder(default = WorldVector::repeat(10.0))] cube_max_size: WorldVector,
        #[builder(default)] material: MaterialSettings,
    ) -> Result<Self, PlacementError> {
        if !placement_radius.is_finite() || placement_radius < 0.0 {
            return Err(PlacementError::InvalidPlacementRadius(placement_radius));
        }

        check_range("sphere radius", &sphere_radius)?;
        check_positive("sphere radius", *sphere_radius.start())?;

        const AXIS_NAMES: [&str; 3] = ["cube width x", "cube width y", "cube width z"];
        for (axis, what) in AXIS_NAMES.into_iter().enumerate() {
            check_range(what, &(cube_min_size[axis]..=cube_max_size[axis]))?;
            check_positive(what, cube_min_size[axis])?;
        }

        material.validate()?;

        Ok(PlacementSettings {
            seed,
            placement_radius,
            sphere_count,
            sphere_radius,
            cube_count,
            cube_min_size,
            cube_max_size,
            material,
        })
    }
}

impl PlacementSettings {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn placement_radius(&self) -> FloatType {
        self.placement_radius
    }

    pub fn sphere_count(&self) -> usize {
        self.sphere_count
    }

    pub fn cube_count(&self) -> usize {
        self.cube_count
    }

    /// Uniform point in the placement disk, on the ground plane (y = 0).
    fn sample_ground_position(&self, rng: &mut impl Rng) -> WorldPoint {
        let [x, z]: [FloatType; 2] = UnitDisc.sample(rng);
        WorldPoint::new(x * self.placement_radius, 0.0, z * self.placement_radius)
    }

    /// Sphere resting on the ground plane.
    fn sample_sphere(&self, rng: &mut impl Rng) -> Sphere {
        let radius = rng.random_range(self.sphere_radius.clone());
        let mut center = self.sample_ground_position(rng);
        center.y = radius;

        Sphere {
            ball: Ball::new(center, radius),
            material: self.material.sample(rng),
        }
    }

    /// Cube with its minimum corner on the ground plane.
    fn sample_cube(&self, rng: &mut impl Rng) -> Cube {
        let min = self.sample_ground_position(rng);
        let size = WorldVector::new(
            rng.random_range(self.cube_min_size.x..=self.cube_max_size.x),
            rng.random_range(self.cube_min_size.y..=self.cube_max_size.y),
            rng.random_range(self.cube_min_size.z..=self.cube_max_size.z),
        );

        Cube {
            bounds: WorldBox::with_size(min, &size),
            material: self.material.sample(rng),
        }
    }
}

fn check_range(what: &'static str, range: &RangeInclusive<FloatType>) -> Result<(), PlacementError> {
    let (min, max) = (*range.start(), *range.end());
    // Written to also reject NaN bounds
    if !(min <= max) {
        return Err(PlacementError::InvalidRange { what, min, max });
    }
    if !min.is_finite() || !max.is_finite() {
        return Err(PlacementError::NonFiniteRange { what, min, max });
    }
    Ok(())
}

fn check_positive(what: &'static str, value: FloatType) -> Result<(), PlacementError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(PlacementError::NonPositiveSize { what, value })
    }
}

fn check_probability(what: &'static str, value: FloatType) -> Result<(), PlacementError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PlacementError::InvalidProbability { what, value })
    }
}

/// Mutually non-intersecting spheres and cubes.
/// Always starts with one anchor sphere and one anchor cube.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitives {
    spheres: Vec<Sphere>,
    cubes: Vec<Cube>,
}

impl Primitives {
    /// Just the two fixed anchor primitives.
    pub fn anchors() -> Primitives {
        let specular = MaterialSettings::default().dielectric_specular;
        Primitives {
            spheres: vec![Sphere {
                ball: Ball::new(WorldPoint::new(0.0, 5.0, 0.0), 5.0),
                material: Material::dielectric(Color::new(0.4, 0.4, 0.8), specular, 0.5),
            }],
            cubes: vec![Cube {
                bounds: WorldBox::new(
                    WorldPoint::new(5.5, 0.0, 0.0),
                    WorldPoint::new(10.0, 5.5, 5.0),
                ),
                material: Material::dielectric(Color::new(0.8, 0.4, 1.0), specular, 0.0),
            }],
        }
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.spheres.len() + self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Box around all primitives, None if there are none.
    pub fn bounding_box(&self) -> Option<WorldBox> {
        self.spheres
            .iter()
            .map(Sphere::bounding_box)
            .chain(self.cubes.iter().map(Cube::bounding_box))
            .reduce(|a, b| a.union(&b))
    }

    /// True if the shape does not intersect any of the primitives.
    fn is_free<T>(&self, shape: &T) -> bool
    where
        T: Intersects<Ball> + Intersects<WorldBox>,
    {
        !self
            .spheres
            .iter()
            .any(|s| Intersects::<Ball>::intersects(shape, &s.ball))
            && !self
                .cubes
                .iter()
                .any(|c| Intersects::<WorldBox>::intersects(shape, &c.bounds))
    }
}

/// Places spheres and then cubes by rejection sampling, starting from the anchors.
/// The result only depends on the settings (including the seed).
pub fn place_primitives(settings: &PlacementSettings) -> Primitives {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut placed = Primitives::anchors();

    let mut rejected_spheres = 0usize;
    for i in 0..settings.sphere_count {
        let candidate = settings.sample_sphere(&mut rng);
        if placed.is_free(&candidate.ball) {
            placed.spheres.push(candidate);
        } else {
            trace!("Rejected sphere candidate {i}: {:?}", candidate.ball);
            rejected_spheres += 1;
        }
    }

    let mut rejected_cubes = 0usize;
    for i in 0..settings.cube_count {
        let candidate = settings.sample_cube(&mut rng);
        if placed.is_free(&candidate.bounds) {
            placed.cubes.push(candidate);
        } else {
            trace!("Rejected cube candidate {i}: {:?}", candidate.bounds);
            rejected_cubes += 1;
        }
    }

    debug!(
        "Placed {} spheres ({} rejected) and {} cubes ({} rejected) with seed {}",
        placed.spheres.len(),
        rejected_spheres,
        placed.cubes.len(),
        rejected_cubes,
        settings.seed,
    );

    placed
}

#[cfg(test)]
mod test {
    use super::*;

    use assert2::{assert, let_assert};
    use itertools::Itertools as _;
    use test_strategy::proptest;

    /// Checks every pair of primitives, anchors included.
    fn assert_no_overlaps(primitives: &Primitives) {
        for (a, b) in primitives.spheres().iter().tuple_combinations() {
            assert!(!a.ball.intersects(&b.ball), "{a:?} overlaps {b:?}");
        }
        for (a, b) in primitives.cubes().iter().tuple_combinations() {
            assert!(!a.bounds.intersects(&b.bounds), "{a:?} overlaps {b:?}");
        }
        for (s, c) in primitives
            .spheres()
            .iter()
            .cartesian_product(primitives.cubes())
        {
            assert!(!s.ball.intersects(&c.bounds), "{s:?} overlaps {c:?}");
        }
    }

    #[test]
    fn defaults_are_valid() {
        let_assert!(Ok(settings) = PlacementSettings::builder().build());
        assert!(settings.seed() == 1_223_832_719);
        assert!(settings.placement_radius() == 100.0);
        assert!(settings.sphere_count() == 10);
        assert!(settings.cube_count() == 10);
    }

    #[test]
    fn anchors_do_not_overlap() {
        let anchors = Primitives::anchors();
        assert!(anchors.spheres().len() == 1);
        assert!(anchors.cubes().len() == 1);
        assert_no_overlaps(&anchors);
    }

    #[test]
    fn zero_counts_give_only_anchors() {
        let settings = PlacementSettings::builder()
            .sphere_count(0)
            .cube_count(0)
            .build()
            .unwrap();
        assert!(place_primitives(&settings) == Primitives::anchors());
    }

    #[test]
    fn default_scene_has_no_overlaps() {
        let settings = PlacementSettings::builder().build().unwrap();
        let primitives = place_primitives(&settings);
        assert!(primitives.spheres().len() <= 11);
        assert!(primitives.cubes().len() <= 11);
        assert_no_overlaps(&primitives);
    }

    #[test]
    fn crowded_scene_rejects_candidates() {
        let settings = PlacementSettings::builder()
            .placement_radius(10.0)
            .sphere_count(50)
            .sphere_radius(4.0..=5.0)
            .cube_count(50)
            .build()
            .unwrap();
        let primitives = place_primitives(&settings);
        assert!(primitives.len() < 102);
        assert_no_overlaps(&primitives);
    }

    #[test]
    fn spheres_rest_on_ground_inside_disk() {
        let settings = PlacementSettings::builder().sphere_count(40).build().unwrap();
        let primitives = place_primitives(&settings);
        for sphere in &primitives.spheres()[1..] {
            assert!(sphere.center().y == sphere.radius());
            assert!((5.0..=30.0).contains(&sphere.radius()));
            let horizontal = (sphere.center().x.powi(2) + sphere.center().z.powi(2)).sqrt();
            assert!(horizontal <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn cubes_sit_on_ground_with_sizes_in_range() {
        let settings = PlacementSettings::builder()
            .cube_count(40)
            .cube_min_size(WorldVector::new(1.0, 2.0, 3.0))
            .cube_max_size(WorldVector::new(4.0, 5.0, 6.0))
            .build()
            .unwrap();
        let primitives = place_primitives(&settings);
        for cube in &primitives.cubes()[1..] {
            assert!(cube.bounds.min.y == 0.0);
            let size = cube.bounds.size();
            assert!(size.x >= 1.0 - 1e-4 && size.x <= 4.0 + 1e-4);
            assert!(size.y >= 2.0 - 1e-4 && size.y <= 5.0 + 1e-4);
            assert!(size.z >= 3.0 - 1e-4 && size.z <= 6.0 + 1e-4);
        }
    }

    #[test]
    fn inverted_sphere_range_is_rejected() {
        let result = PlacementSettings::builder().sphere_radius(3.0..=2.0).build();
        let_assert!(Err(PlacementError::InvalidRange { what, min, max }) = result);
        assert!(what == "sphere radius");
        assert!(min == 3.0);
        assert!(max == 2.0);
    }

    #[test]
    fn inverted_cube_width_is_rejected() {
        let result = PlacementSettings::builder()
            .cube_min_size(WorldVector::new(1.0, 6.0, 1.0))
            .cube_max_size(WorldVector::new(10.0, 5.0, 10.0))
            .build();
        let_assert!(Err(PlacementError::InvalidRange { what, .. }) = result);
        assert!(what == "cube width y");
    }

    #[test]
    fn nan_range_is_rejected() {
        let result = PlacementSettings::builder()
            .sphere_radius(f32::NAN..=1.0)
            .build();
        let_assert!(Err(PlacementError::InvalidRange { .. }) = result);
    }

    #[test]
    fn infinite_sphere_radius_is_rejected() {
        let result = PlacementSettings::builder()
            .sphere_radius(1.0..=f32::INFINITY)
            .build();
        let_assert!(Err(PlacementError::NonFiniteRange { what, min, .. }) = result);
        assert!(what == "sphere radius");
        assert!(min == 1.0);
    }

    #[test]
    fn infinite_cube_width_is_rejected() {
        let result = PlacementSettings::builder()
            .cube_max_size(WorldVector::new(10.0, f32::INFINITY, 10.0))
            .build();
        let_assert!(Err(PlacementError::NonFiniteRange { what, .. }) = result);
        assert!(what == "cube width y");
    }

    #[test]
    fn infinite_smoothness_is_rejected() {
        let material = MaterialSettings {
            dielectric_smoothness: 0.5..=f32::INFINITY,
            ..Default::default()
        };
        let result = PlacementSettings::builder().material(material).build();
        let_assert!(Err(PlacementError::NonFiniteRange { what, .. }) = result);
        assert!(what == "dielectric smoothness");
    }

    #[test]
    fn zero_radius_is_rejected() {
        let result = PlacementSettings::builder().sphere_radius(0.0..=1.0).build();
        let_assert!(Err(PlacementError::NonPositiveSize { .. }) = result);
    }

    #[test]
    fn negative_placement_radius_is_rejected() {
        let result = PlacementSettings::builder().placement_radius(-1.0).build();
        assert!(result == Err(PlacementError::InvalidPlacementRadius(-1.0)));
    }

    #[test]
    fn invalid_probability_is_rejected() {
        let material = MaterialSettings {
            metal_probability: 1.5,
            ..Default::default()
        };
        let result = PlacementSettings::builder().material(material).build();
        let_assert!(Err(PlacementError::InvalidProbability { what, .. }) = result);
        assert!(what == "metal");
    }

    #[test]
    fn metals_have_colored_specular() {
        let settings = MaterialSettings {
            metal_probability: 1.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let material = settings.sample(&mut rng);
            assert!(material.albedo == Color::zeros());
            assert!(material.emission == Color::zeros());
            assert!(material.smoothness == 0.0);
        }
    }

    #[test]
    fn dielectrics_have_gray_specular() {
        let settings = MaterialSettings {
            metal_probability: 0.0,
            emission_probability: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let material = settings.sample(&mut rng);
            assert!(material.specular == Color::repeat(0.04));
            assert!(material.emission == Color::zeros());
            assert!((0.5..=1.0).contains(&material.smoothness));
        }
    }

    #[proptest(cases = 64)]
    fn placement_never_overlaps(
        seed: u64,
        #[strategy(0.0f32..60.0)] placement_radius: f32,
        #[strategy(0usize..25)] sphere_count: usize,
        #[strategy(0usize..25)] cube_count: usize,
    ) {
        let settings = PlacementSettings::builder()
            .seed(seed)
            .placement_radius(placement_radius)
            .sphere_count(sphere_count)
            .sphere_radius(1.0..=8.0)
            .cube_count(cube_count)
            .build()
            .unwrap();
        let primitives = place_primitives(&settings);
        assert!(primitives.spheres().len() <= sphere_count + 1);
        assert!(primitives.cubes().len() <= cube_count + 1);
        assert_no_overlaps(&primitives);
    }

    #[proptest(cases = 32)]
    fn placement_is_deterministic(seed: u64) {
        let settings = PlacementSettings::builder()
            .seed(seed)
            .sphere_count(20)
            .cube_count(20)
            .build()
            .unwrap();
        let a = place_primitives(&settings);
        let b = place_primitives(&settings.clone());
        assert!(a == b);
    }
}
