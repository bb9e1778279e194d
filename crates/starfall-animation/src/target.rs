//! Field access on animated objects

use crate::field::{AnimateField, FieldValue};
use starfall_scene::Node;

/// Something whose fields animations can read and write.
///
/// Writes go through the field's setter so dirty tracking stays intact.
pub trait AnimationTarget {
    fn read_field(&self, field: AnimateField) -> FieldValue;
    fn write_field(&mut self, field: AnimateField, value: &FieldValue);
}

impl AnimationTarget for Node {
    fn read_field(&self, field: AnimateField) -> FieldValue {
        match field {
            AnimateField::Position => FieldValue::Vec3(self.position),
            AnimateField::Rotation => FieldValue::Vec3(self.rotation),
            AnimateField::Scale => FieldValue::Vec3(self.scale),
            AnimateField::Color => FieldValue::Vec3(self.color),
            AnimateField::Opacity => FieldValue::Scalar(self.opacity.get()),
        }
    }

    fn write_field(&mut self, field: AnimateField, value: &FieldValue) {
        let slot = match field {
            AnimateField::Position => &mut self.position,
            AnimateField::Rotation => &mut self.rotation,
            AnimateField::Scale => &mut self.scale,
            AnimateField::Color => &mut self.color,
            AnimateField::Opacity => {
                if let FieldValue::Vec3(_) = value {
                    log::debug!("vector written to opacity of '{}', using x", self.name());
                }
                self.opacity.set(value.as_scalar());
                return;
            }
        };
        if let FieldValue::Scalar(_) = value {
            log::debug!("scalar written to {:?} field, splatting", field);
        }
        slot.set_vec3(&value.as_vec3());
    }
}
