use super::types::{Children, Parent, Transform3D, WorldTransform3D};
use bevy_ecs::prelude::*;
use glam::Mat4;
use smallvec::SmallVec;

#[derive(Resource, Default)]
pub struct TransformPropagationScratch {
    pub stack: SmallVec<[(Entity, Mat4); 128]>,
}

/// Walks every hierarchy from its roots, composing `parent_world * local`.
pub fn sys_propagate_transforms(
    mut nodes: Query<(&Transform3D, Option<&Children>, &mut WorldTransform3D)>,
    roots: Query<Entity, (With<WorldTransform3D>, Without<Parent>)>,
    mut scratch: ResMut<TransformPropagationScratch>,
) {
    let mut stack = std::mem::take(&mut scratch.stack);
    stack.clear();

    for root in roots.iter() {
        stack.push((root, Mat4::IDENTITY));
        while let Some((entity, parent_world)) = stack.pop() {
            let Ok((transform, children, mut world)) = nodes.get_mut(entity) else {
                continue;
            };
            let world_mat = parent_world * transform.local_matrix();
            world.0 = world_mat;
            if let Some(children) = children {
                for &child in children.0.iter().rev() {
                    stack.push((child, world_mat));
                }
            }
        }
    }

    scratch.stack = stack;
}
