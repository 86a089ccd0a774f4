pub(crate) mod dm365;
