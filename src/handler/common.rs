use chrono::{SecondsFormat, Utc};

use crate::context::ExceptionContext;

/// Add request metadata shared by every handler to the response.
///
/// The failure kind is only added in development mode.
pub fn add_common_info(ctx: &mut ExceptionContext) {
    let request_id = ctx.request_id().to_string();
    let locale = ctx.locale().to_string();
    let instance = ctx.instance_id().map(str::to_string);
    let exception = ctx.is_dev().then(|| ctx.failure().kind().to_string());

    let response = ctx.response_mut().status_error();
    response
        .add_meta("request_id", request_id)
        .add_meta(
            "timestamp",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        )
        .add_meta("locale", locale);

    if let Some(instance) = instance {
        response.add_meta("instance", instance);
    }
    if let Some(exception) = exception {
        response.add_meta("exception", exception);
    }
}
