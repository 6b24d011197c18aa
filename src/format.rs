//! PRC type tags and format constants.
//!
//! Tags are grouped by category base (`CRV`, `SURF`, `TOPO`, ...) exactly as the
//! PRC type registry numbers them; consuming viewers match them bit for bit.

/// Root tag. Also the "no entity" placeholder for absent references.
pub const PRC_TYPE_ROOT: u32 = 0;

pub const PRC_TYPE_CRV: u32 = PRC_TYPE_ROOT + 10;
pub const PRC_TYPE_SURF: u32 = PRC_TYPE_ROOT + 75;
pub const PRC_TYPE_TOPO: u32 = PRC_TYPE_ROOT + 140;
pub const PRC_TYPE_TESS: u32 = PRC_TYPE_ROOT + 170;
pub const PRC_TYPE_MISC: u32 = PRC_TYPE_ROOT + 200;
pub const PRC_TYPE_RI: u32 = PRC_TYPE_ROOT + 230;
pub const PRC_TYPE_MKP: u32 = PRC_TYPE_ROOT + 500;
pub const PRC_TYPE_GRAPH: u32 = PRC_TYPE_ROOT + 700;

// ============================================================================
// Curves
// ============================================================================

pub const PRC_TYPE_CRV_NURBS: u32 = PRC_TYPE_CRV + 3;
pub const PRC_TYPE_CRV_CIRCLE: u32 = PRC_TYPE_CRV + 4;
pub const PRC_TYPE_CRV_COMPOSITE: u32 = PRC_TYPE_CRV + 5;
pub const PRC_TYPE_CRV_POLYLINE: u32 = PRC_TYPE_CRV + 15;

// ============================================================================
// Surfaces
// ============================================================================

pub const PRC_TYPE_SURF_BLEND01: u32 = PRC_TYPE_SURF + 2;
pub const PRC_TYPE_SURF_NURBS: u32 = PRC_TYPE_SURF + 5;
pub const PRC_TYPE_SURF_CYLINDER: u32 = PRC_TYPE_SURF + 7;
pub const PRC_TYPE_SURF_RULED: u32 = PRC_TYPE_SURF + 12;
pub const PRC_TYPE_SURF_SPHERE: u32 = PRC_TYPE_SURF + 13;
pub const PRC_TYPE_SURF_TORUS: u32 = PRC_TYPE_SURF + 17;

// ============================================================================
// Topology
// ============================================================================

pub const PRC_TYPE_TOPO_CONTEXT: u32 = PRC_TYPE_TOPO + 1;
pub const PRC_TYPE_TOPO_WIRE_EDGE: u32 = PRC_TYPE_TOPO + 5;
pub const PRC_TYPE_TOPO_FACE: u32 = PRC_TYPE_TOPO + 9;
pub const PRC_TYPE_TOPO_SHELL: u32 = PRC_TYPE_TOPO + 10;
pub const PRC_TYPE_TOPO_CONNEX: u32 = PRC_TYPE_TOPO + 11;
pub const PRC_TYPE_TOPO_SINGLE_WIRE_BODY: u32 = PRC_TYPE_TOPO + 13;
pub const PRC_TYPE_TOPO_BREP_DATA: u32 = PRC_TYPE_TOPO + 14;
pub const PRC_TYPE_TOPO_SINGLE_WIRE_BODY_COMPRESS: u32 = PRC_TYPE_TOPO + 15;
pub const PRC_TYPE_TOPO_BREP_DATA_COMPRESS: u32 = PRC_TYPE_TOPO + 16;

// ============================================================================
// Tessellation
// ============================================================================

pub const PRC_TYPE_TESS_3D: u32 = PRC_TYPE_TESS + 2;
pub const PRC_TYPE_TESS_3D_COMPRESSED: u32 = PRC_TYPE_TESS + 3;
pub const PRC_TYPE_TESS_FACE: u32 = PRC_TYPE_TESS + 4;
pub const PRC_TYPE_TESS_3D_WIRE: u32 = PRC_TYPE_TESS + 5;
pub const PRC_TYPE_TESS_MARKUP: u32 = PRC_TYPE_TESS + 6;

// ============================================================================
// Miscellaneous
// ============================================================================

pub const PRC_TYPE_MISC_ATTRIBUTE: u32 = PRC_TYPE_MISC + 1;
pub const PRC_TYPE_MISC_CARTESIAN_TRANSFORMATION: u32 = PRC_TYPE_MISC + 2;
pub const PRC_TYPE_MISC_REFERENCE_ON_PRC_BASE: u32 = PRC_TYPE_MISC + 5;
pub const PRC_TYPE_MISC_GENERAL_TRANSFORMATION: u32 = PRC_TYPE_MISC + 7;

// ============================================================================
// Representation items
// ============================================================================

pub const PRC_TYPE_RI_BREP_MODEL: u32 = PRC_TYPE_RI + 2;
pub const PRC_TYPE_RI_CURVE: u32 = PRC_TYPE_RI + 3;
pub const PRC_TYPE_RI_POINT_SET: u32 = PRC_TYPE_RI + 6;
pub const PRC_TYPE_RI_POLY_BREP_MODEL: u32 = PRC_TYPE_RI + 7;
pub const PRC_TYPE_RI_POLY_WIRE: u32 = PRC_TYPE_RI + 8;
pub const PRC_TYPE_RI_SET: u32 = PRC_TYPE_RI + 9;
pub const PRC_TYPE_RI_COORDINATE_SYSTEM: u32 = PRC_TYPE_RI + 10;

// ============================================================================
// Markup
// ============================================================================

pub const PRC_TYPE_MKP_MARKUP: u32 = PRC_TYPE_MKP + 2;
pub const PRC_TYPE_MKP_ANNOTATION_ITEM: u32 = PRC_TYPE_MKP + 4;

// ============================================================================
// Graphics
// ============================================================================

pub const PRC_TYPE_GRAPH_STYLE: u32 = PRC_TYPE_GRAPH + 1;
pub const PRC_TYPE_GRAPH_MATERIAL: u32 = PRC_TYPE_GRAPH + 2;
pub const PRC_TYPE_GRAPH_PICTURE: u32 = PRC_TYPE_GRAPH + 3;
pub const PRC_TYPE_GRAPH_TEXTURE_APPLICATION: u32 = PRC_TYPE_GRAPH + 11;
pub const PRC_TYPE_GRAPH_TEXTURE_DEFINITION: u32 = PRC_TYPE_GRAPH + 12;

/// Check if a body tag denotes a compressed representation.
#[inline]
pub const fn is_compressed_type(tag: u32) -> bool {
    matches!(
        tag,
        PRC_TYPE_TOPO_BREP_DATA_COMPRESS
            | PRC_TYPE_TOPO_SINGLE_WIRE_BODY_COMPRESS
            | PRC_TYPE_TESS_3D_COMPRESSED
    )
}

// ============================================================================
// Flags
// ============================================================================

/// Behaviour flags of cartesian and partial transformations.
pub mod transformation {
    pub const IDENTITY: u8 = 0x00;
    pub const TRANSLATE: u8 = 0x01;
    pub const ROTATE: u8 = 0x02;
    pub const MIRROR: u8 = 0x04;
    pub const SCALE: u8 = 0x08;
    pub const NON_UNIFORM_SCALE: u8 = 0x10;
    pub const NON_ORTHO: u8 = 0x20;
    pub const HOMOGENEOUS: u8 = 0x40;
}

/// `used_entities_flag` bits of a tessellated face.
pub mod face_tess {
    pub const POLYFACE: u32 = 0x0001;
    pub const TRIANGLE: u32 = 0x0002;
    pub const TRIANGLE_FAN: u32 = 0x0004;
    pub const TRIANGLE_STRIPE: u32 = 0x0008;
    pub const POLYFACE_ONE_NORMAL: u32 = 0x0010;
    pub const TRIANGLE_ONE_NORMAL: u32 = 0x0020;
    pub const TRIANGLE_FAN_ONE_NORMAL: u32 = 0x0040;
    pub const TRIANGLE_STRIPE_ONE_NORMAL: u32 = 0x0080;
    pub const POLYFACE_TEXTURED: u32 = 0x0100;
    pub const TRIANGLE_TEXTURED: u32 = 0x0200;
    pub const TRIANGLE_FAN_TEXTURED: u32 = 0x0400;
    pub const TRIANGLE_STRIPE_TEXTURED: u32 = 0x0800;
    pub const POLYFACE_ONE_NORMAL_TEXTURED: u32 = 0x1000;
    pub const TRIANGLE_ONE_NORMAL_TEXTURED: u32 = 0x2000;
    pub const TRIANGLE_FAN_ONE_NORMAL_TEXTURED: u32 = 0x4000;
    pub const TRIANGLE_STRIPE_ONE_NORMAL_TEXTURED: u32 = 0x8000;

    /// Any of the textured variants.
    pub const ANY_TEXTURED: u32 = POLYFACE_TEXTURED
        | TRIANGLE_TEXTURED
        | TRIANGLE_FAN_TEXTURED
        | TRIANGLE_STRIPE_TEXTURED
        | POLYFACE_ONE_NORMAL_TEXTURED
        | TRIANGLE_ONE_NORMAL_TEXTURED
        | TRIANGLE_FAN_ONE_NORMAL_TEXTURED
        | TRIANGLE_STRIPE_ONE_NORMAL_TEXTURED;
}

/// Texture enumerations written by texture definitions.
pub mod texture {
    pub const MAPPING_TYPE_STORED: i32 = 1;

    pub const FUNCTION_UNKNOWN: i32 = 0;
    pub const FUNCTION_MODULATE: i32 = 1;
    pub const FUNCTION_REPLACE: i32 = 2;
    pub const FUNCTION_BLEND: i32 = 3;
    pub const FUNCTION_DECAL: i32 = 4;

    pub const BLEND_PARAMETER_UNKNOWN: i32 = 0;
    pub const ALPHA_TEST_UNKNOWN: i32 = 0;

    pub const WRAPPING_MODE_UNKNOWN: i32 = 0;
    pub const WRAPPING_MODE_REPEAT: i32 = 1;
    pub const WRAPPING_MODE_CLAMP_TO_BORDER: i32 = 2;
    pub const WRAPPING_MODE_CLAMP: i32 = 3;
    pub const WRAPPING_MODE_CLAMP_TO_EDGE: i32 = 4;
    pub const WRAPPING_MODE_MIRRORED_REPEAT: i32 = 5;

    pub const APPLYING_MODE_NONE: u8 = 0x00;
    pub const APPLYING_MODE_LIGHTING: u8 = 0x01;
    pub const APPLYING_MODE_ALPHATEST: u8 = 0x02;
    pub const APPLYING_MODE_VERTEXCOLOR: u8 = 0x04;

    pub const MAPPING_DIFFUSE: u32 = 0x0001;
    pub const MAPPING_COMPONENTS_RGBA: u8 = 0x0F;
}

/// Entity code of an analytic/NURBS face inside a compressed shell.
pub const COMPRESSED_ANA_NURBS: u32 = 13;
