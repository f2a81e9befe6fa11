use crate::error::CfracError;

pub(crate) type CResult<T> = Result<T, CfracError>;
