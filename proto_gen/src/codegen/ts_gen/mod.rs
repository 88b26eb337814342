pub mod class_shape;
pub mod field_type;
pub mod helpers;
pub mod long_repr;
pub mod map_type;
pub mod oneof;
pub mod ts_type;

/* Re-export the pieces the file assembler and commands use */
pub use class_shape::{ClassDecl, ClassShapeBuilder, CtorParam, ParamSource};
pub use field_type::{TypeContext, resolve_field_type};
pub use map_type::map_type;
pub use oneof::{OneofAdt, OneofVariant, resolve_group, synthesize_oneof};
pub use ts_type::{TsPrimitive, TsProperty, TsType};
