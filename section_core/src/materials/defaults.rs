//! Built-in materials.
//!
//! Typical design values for common structural materials. Concrete yield
//! strength is its characteristic compressive strength.

use once_cell::sync::Lazy;

use super::Material;

static DEFAULT_MATERIALS: Lazy<Vec<Material>> = Lazy::new(|| {
    vec![
        material("Aluminium", 70e3, 0.33, 2.7e-6, 160.0, "lightgrey"),
        material("Steel", 210e3, 0.3, 7.85e-6, 355.0, "grey"),
        material("Concrete", 30e3, 0.2, 2.4e-6, 25.0, "lightblue"),
        material("Timber", 11e3, 0.3, 0.5e-6, 20.0, "brown"),
        material("Glass", 70e3, 0.22, 2.5e-6, 50.0, "lightcyan"),
    ]
});

fn material(name: &str, e: f64, nu: f64, rho: f64, fy: f64, color: &str) -> Material {
    Material {
        name: name.to_string(),
        elastic_modulus_mpa: e,
        poissons_ratio: nu,
        density_kg_per_mm3: rho,
        yield_strength_mpa: fy,
        color: color.to_string(),
    }
}

/// The built-in materials in presentation order.
pub fn default_materials() -> &'static [Material] {
    &DEFAULT_MATERIALS
}
