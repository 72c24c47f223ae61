use crate::core::common::Float;
use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::frame::ReferenceFrame;

pub const MAX_OBJECT_DEPTH: usize = 4;

/// Path from the outermost aggregate down to the object that was hit.
/// Returned by value with each hit, so nothing about the traversal is shared
/// between threads.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ObjectChain {
    ids: [u32; MAX_OBJECT_DEPTH],
    len: u8
}

impl ObjectChain {
    pub fn root(id: u32) -> Self {
        Self::default().push(id)
    }

    /// Appends `id` as the new innermost object. The chain saturates at
    /// `MAX_OBJECT_DEPTH`, keeping the innermost object last.
    pub fn push(mut self, id: u32) -> Self {
        if (self.len as usize) < MAX_OBJECT_DEPTH {
            self.ids[self.len as usize] = id;
            self.len += 1;
        } else {
            self.ids[MAX_OBJECT_DEPTH - 1] = id;
        }

        self
    }

    pub fn leaf(&self) -> Option<u32> {
        if self.len == 0 { None } else { Some(self.ids[self.len as usize - 1]) }
    }

    pub fn depth(&self) -> usize { self.len as usize }

    pub fn is_empty(&self) -> bool { self.len == 0 }
}

/// A point on a surface, light or lens. Points at infinity store the
/// direction toward them in `p`.
#[derive(Debug, Default, Copy, Clone)]
pub struct SurfacePoint {
    pub p               : Point3f,
    pub at_infinity     : bool,
    pub gnormal         : Normal3f,
    pub shading_frame   : ReferenceFrame,
    pub obj             : ObjectChain
}

impl SurfacePoint {
    pub fn new(p: Point3f, gnormal: Normal3f, obj: ObjectChain) -> Self {
        Self {
            p,
            at_infinity: false,
            gnormal,
            shading_frame: ReferenceFrame::from_normal(&gnormal),
            obj
        }
    }

    pub fn at_infinity(dir: &Vector3f, obj: ObjectChain) -> Self {
        let gnormal = Normal3f::from(-*dir);

        Self {
            p: Point3f::from(*dir),
            at_infinity: true,
            gnormal,
            shading_frame: ReferenceFrame::from_normal(&gnormal),
            obj
        }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        self.shading_frame.to_local(v)
    }

    pub fn from_local(&self, v: &Vector3f) -> Vector3f {
        self.shading_frame.from_local(v)
    }

    pub fn local_gnormal(&self) -> Normal3f {
        Normal3f::from(self.shading_frame.to_local(&Vector3f::from(self.gnormal)))
    }

    /// |cos| between a world direction and the geometric normal.
    pub fn calc_cos_term(&self, v: &Vector3f) -> Float {
        v.abs_dot_norm(&self.gnormal)
    }

    /// Unit direction from `p` toward this point and the squared distance,
    /// which is 1 for points at infinity.
    pub fn direction_from(&self, p: &Point3f) -> (Vector3f, Float) {
        if self.at_infinity {
            (Vector3f::from(self.p).normalize(), 1.0)
        } else {
            let v = self.p - *p;
            let dist2 = v.length_squared();

            (v / dist2.sqrt(), dist2)
        }
    }
}

pub fn squared_distance(p0: &SurfacePoint, p1: &SurfacePoint) -> Float {
    if p0.at_infinity || p1.at_infinity {
        1.0
    } else {
        p0.p.distance_squared(&p1.p)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct SurfaceInteraction {
    pub pt      : SurfacePoint,
    pub dist    : Float,
    pub time    : Float
}
