//! Route paths.

pub const POST_USERS_REGISTER: &str = "/api/v1/users/register";
pub const POST_USERS_LOGIN: &str = "/api/v1/users/login";
pub const POST_USERS_LOGOUT: &str = "/api/v1/users/logout";
pub const POST_USERS_REFRESH_TOKEN: &str = "/api/v1/users/refresh-token";
pub const GET_USERS_DETAILS: &str = "/api/v1/users/user-details";
pub const POST_USERS_UPDATE_PASSWORD: &str = "/api/v1/users/update-password";
pub const PATCH_USERS_UPDATE_DETAILS: &str = "/api/v1/users/update-details";
pub const PATCH_USERS_UPDATE_AVATAR: &str = "/api/v1/users/update-avatar";
pub const PATCH_USERS_UPDATE_COVER_IMAGE: &str = "/api/v1/users/update-coverimage";
pub const GET_USERS_CHANNEL: &str = "/api/v1/users/c/{username}";
pub const POST_USERS_CHANNEL_SUBSCRIBE: &str = "/api/v1/users/c/{username}/subscribe";
pub const GET_USERS_WATCH_HISTORY: &str = "/api/v1/users/watch-history";

pub const POST_VIDEOS_UPLOAD: &str = "/api/v1/videos/upload";
pub const VIDEOS_VIDEO_ID: &str = "/api/v1/videos/video/{video_id}";
pub const POST_VIDEOS_WATCH: &str = "/api/v1/videos/video/{video_id}/watch";
pub const PUT_VIDEOS_TOGGLE_PUBLISH: &str = "/api/v1/videos/video/togglepublish/{video_id}";
