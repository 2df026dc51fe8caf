pub(crate) mod analysis;
