//! Fixed paths of the platform's private API.

/// Primary host.
pub const BASE_URL: &str = "https://www.aparat.com";

/// Host receiving binary uploads.
pub const UPLOAD_BASE_URL: &str = "https://uc3.aparat.com";

/// Every handshake step carries this query parameter.
pub const CALLBACK_TYPE: (&str, &str) = ("callbackType", "postmessage");

// Authentication
pub const SIGNIN_PAGE: &str = "/signin";
pub const AUTH_TEMP_ID: &str = "/api/fa/v1/user/Authenticate/auth";
pub const SIGNIN_STEP1: &str = "/api/fa/v1/user/Authenticate/signin_step1";
pub const SIGNIN_STEP2: &str = "/api/fa/v1/user/Authenticate/signin_step2";
pub const SIGNUP_STEP1: &str = "/api/fa/v1/user/Authenticate/signup_step1";
pub const SIGNUP_STEP2: &str = "/api/fa/v1/user/Authenticate/signup_step2";

/// Prefix of the verification link mailed during signup.
pub const SIGNUP_LINK_PREFIX: &str = "http://email.aparat.com/ls/click?upn=u001.";

// Session probes
pub const CONFIG_PROBE: &str = "/api/fa/v1/etc/page/config/mode/full";
pub const USER_INFORMATION: &str = "/api/fa/v1/user/user/information";

// Resources
pub const USER_BY_USERNAME: &str = "/api/fa/v1/user/user/information/username";
pub const MY_VIDEOS: &str = "/api/fa/v1/user/video/videos";
pub const VIDEO_SHOW: &str = "/api/fa/v1/video/video/show/videohash";
pub const VIDEO_REPORT: &str = "/api/fa/v1/video/video/report/videohash";
pub const COMMENT_LIST: &str = "/api/fa/v1/video/comment/list/videohash";
pub const COMMENT_REPLY: &str = "/api/fa/v1/video/comment/reply_v2/videohash";
pub const COMMENT_REPLIES: &str = "/api/fa/v1/video/comment/list_replies/comment_id";
pub const PLAYLIST_ONE: &str = "/api/fa/v1/video/playlist/one/playlist_id";
pub const NOTIFICATIONS: &str = "/api/fa/v1/user/message/list";
pub const DASHBOARD: &str = "/api/fa/v1/user/dashboard/comments/list_type/all";

// Upload, primary host
pub const UPLOAD_SLOT: &str = "/api/fa/v1/video/upload/upload_url";
pub const UPLOAD_FINALIZE: &str = "/api/fa/v1/video/upload/upload/uploadId";

// Upload, upload host
pub const CHUNK_PROBE: &str = "/chunks";
pub const CHUNK_UPLOAD: &str = "/upload";
pub const FILE_DONE: &str = "/file";
pub const CHUNKS_DONE: &str = "/chunksdone";
