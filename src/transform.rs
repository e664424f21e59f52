pub(crate) mod affine;
