pub mod api_path;
pub mod response;
pub mod validated_json;

pub use api_path::ApiPath;
pub use response::{ApiError, ApiResponse, HOME_PATH, LOGIN_PATH};
pub use validated_json::{ValidatedForm, ValidatedJson, ValidatedRejection};
