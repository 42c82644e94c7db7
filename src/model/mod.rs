pub(crate) mod photo;
pub(crate) mod upload_result;
