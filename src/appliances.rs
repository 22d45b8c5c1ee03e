//! Interactive appliances. Each one is split into a controller holding the
//! animation state and a model holding handles to its nodes in the scene graph.

pub mod cabinet;
pub mod microwave;
pub mod refrigerator;
pub mod stove;

pub use cabinet::{Cabinet, CabinetModel};
pub use microwave::{Microwave, MicrowaveModel};
pub use refrigerator::{Refrigerator, RefrigeratorModel};
pub use stove::{Burner, Stove, StoveModel, BURNER_COUNT};

use crate::time::FrameTime;

/// A component advanced once per rendered frame.
pub trait FrameUpdate {
    fn update(&mut self, frame: &FrameTime);
}

/// Shared palette for the appliance bodies.
pub(crate) mod palette {
    use crate::scene_graph::Material;

    pub fn metal() -> Material {
        Material::standard(0xb4b4b8, 0.3, 0.7)
    }

    pub fn dark_metal() -> Material {
        Material::standard(0x444444, 0.5, 0.7)
    }

    pub fn black() -> Material {
        Material::standard(0x111111, 0.5, 0.5)
    }

    pub fn chrome() -> Material {
        Material::standard(0xaaaaaa, 0.2, 0.8)
    }

    pub fn white_enamel() -> Material {
        Material::standard(0xf0f0f0, 0.2, 0.1)
    }

    pub fn wood() -> Material {
        Material::standard(0xd9b77e, 0.8, 0.1)
    }

    pub fn marble() -> Material {
        Material::standard(0xeeeeea, 0.3, 0.2)
    }
}
