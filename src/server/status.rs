//! HTTP status codes and the reason-phrase table.

use std::fmt;

/// An entry of the status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HttpStatus {
    pub code: u16,
    pub message: &'static str,
}

const fn status(code: u16, message: &'static str) -> HttpStatus {
    HttpStatus { code, message }
}

// Sorted by code for binary search.
static STATUSES: &[HttpStatus] = &[
    status(100, "Continue"),
    status(101, "Switching Protocols"),
    status(102, "Processing"),
    status(103, "Early Hints"),
    status(200, "OK"),
    status(201, "Created"),
    status(202, "Accepted"),
    status(203, "Non-Authoritative Information"),
    status(204, "No Content"),
    status(205, "Reset Content"),
    status(206, "Partial Content"),
    status(207, "Multi-Status"),
    status(208, "Already Reported"),
    status(218, "This is fine (Apache Web Server)"),
    status(226, "IM Used"),
    status(300, "Multiple Choices"),
    status(301, "Moved Permanently"),
    status(302, "Found"),
    status(303, "See Other"),
    status(304, "Not Modified"),
    status(306, "Switch Proxy"),
    status(307, "Temporary Redirect"),
    status(308, "Resume Incomplete"),
    status(400, "Bad Request"),
    status(401, "Unauthorized"),
    status(402, "Payment Required"),
    status(403, "Forbidden"),
    status(404, "Not Found"),
    status(405, "Method Not Allowed"),
    status(406, "Not Acceptable"),
    status(407, "Proxy Authentication Required"),
    status(408, "Request Timeout"),
    status(409, "Conflict"),
    status(410, "Gone"),
    status(411, "Length Required"),
    status(412, "Precondition Failed"),
    status(413, "Request Entity Too Large"),
    status(414, "Request-URI Too Long"),
    status(415, "Unsupported Media Type"),
    status(416, "Requested Range Not Satisfiable"),
    status(417, "Expectation Failed"),
    status(418, "I'm a teapot"),
    status(419, "Page Expired (Laravel Framework)"),
    status(420, "Method Failure (Spring Framework)"),
    status(421, "Misdirected Request"),
    status(422, "Unprocessable Entity"),
    status(423, "Locked"),
    status(424, "Failed Dependency"),
    status(426, "Upgrade Required"),
    status(428, "Precondition Required"),
    status(429, "Too Many Requests"),
    status(431, "Request Header Fields Too Large"),
    status(440, "Login Time-out (Microsoft)"),
    status(444, "No Response (Nginx)"),
    status(449, "Retry With (Microsoft)"),
    status(450, "Blocked by Windows Parental Controls (Microsoft)"),
    status(451, "Unavailable For Legal Reasons"),
    status(460, "Client closed connection (AWS ELB)"),
    status(463, "X-Forwarded-For header malformed (AWS ELB)"),
    status(494, "Request Header Too Large (Nginx)"),
    status(495, "SSL Certificate Error (Nginx)"),
    status(496, "SSL Certificate Required (Nginx)"),
    status(497, "HTTP Request Sent to HTTPS Port (Nginx)"),
    status(498, "Invalid Token (Esri)"),
    status(499, "Client Closed Request (Nginx)"),
    status(500, "Internal Server Error"),
    status(501, "Not Implemented"),
    status(502, "Bad Gateway"),
    status(503, "Service Unavailable"),
    status(504, "Gateway Timeout"),
    status(505, "HTTP Version Not Supported"),
    status(506, "Variant Also Negotiates"),
    status(507, "Insufficient Storage"),
    status(508, "Loop Detected"),
    status(509, "Bandwidth Limit Exceeded (Apache Web Server/cPanel)"),
    status(510, "Not Extended"),
    status(511, "Network Authentication Required"),
    status(520, "Unknown Error (Cloudflare)"),
    status(521, "Web Server Is Down (Cloudflare)"),
    status(522, "Connection Timed Out (Cloudflare)"),
    status(523, "Origin Is Unreachable (Cloudflare)"),
    status(524, "A Timeout Occurred (Cloudflare)"),
    status(525, "SSL Handshake Failed (Cloudflare)"),
    status(526, "Invalid SSL Certificate (Cloudflare)"),
    status(527, "Railgun Error (Cloudflare)"),
    status(530, "Site is Frozen"),
    status(598, "Network Read Timeout Error"),
    status(599, "Network Connect Timeout Error"),
];

/// Look up a status code in the table.
pub fn lookup(code: u16) -> Option<&'static HttpStatus> {
    STATUSES
        .binary_search_by_key(&code, |s| s.code)
        .ok()
        .map(|idx| &STATUSES[idx])
}

/// Render `"<code> <message>"` for the status line.
///
/// Unregistered codes render the zero-value entry, `"0 "`.
pub fn status_string(code: u16) -> String {
    let entry = lookup(code).copied().unwrap_or_default();
    format!("{} {}", entry.code, entry.message)
}

/// An HTTP status code.
///
/// Any `u16` can be carried, but only codes present in the status table
/// render a meaningful status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const CONTINUE: StatusCode = StatusCode(100);
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const ACCEPTED: StatusCode = StatusCode(202);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const MOVED_PERMANENTLY: StatusCode = StatusCode(301);
    pub const FOUND: StatusCode = StatusCode(302);
    pub const NOT_MODIFIED: StatusCode = StatusCode(304);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const CONFLICT: StatusCode = StatusCode(409);
    pub const REQUEST_ENTITY_TOO_LARGE: StatusCode = StatusCode(413);
    pub const UNPROCESSABLE_ENTITY: StatusCode = StatusCode(422);
    pub const TOO_MANY_REQUESTS: StatusCode = StatusCode(429);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const NOT_IMPLEMENTED: StatusCode = StatusCode(501);
    pub const BAD_GATEWAY: StatusCode = StatusCode(502);
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    pub const fn new(code: u16) -> Self {
        StatusCode(code)
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Get the reason phrase for this status code, if it is registered.
    pub fn reason_phrase(&self) -> Option<&'static str> {
        lookup(self.0).map(|s| s.message)
    }

    pub fn is_registered(&self) -> bool {
        lookup(self.0).is_some()
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&status_string(self.0))
    }
}
