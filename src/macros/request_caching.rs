/// check if a request is in the cache, if it is, return it.
/// else follow the normal flow
///
/// the cache is best effort: when redis is unreachable we log and serve
/// straight from the database.
///
/// does nothing when debug enabled
macro_rules! read_cache_request {
    ( $origin:expr ) => {
        if !cfg!(debug_assertions) {
            let uri = $origin.path().to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => {
                    if let Ok(true) = Redis::has_data::<String>(r_conn, uri.clone()) {
                        if let Ok(data) = Redis::get_data::<String, String>(r_conn, uri) {
                            if let Ok(cached) = serde_json::from_str(&data) {
                                return Ok(cached);
                            }
                        }
                    }
                },
                Err(error) => {
                    warn!(target:"macros/request_caching", "Error connecting to redis, serving uncached: {}", error);
                }
            }
        }
    }
}

/// add the response to the request to the cache and then return it.
///
/// if debug is enabled we wont add to cache.
macro_rules! cache_response {
    ( $origin:expr, $data:expr ) => {
        if !cfg!(debug_assertions) {
            let uri = $origin.path().to_string();
            match &mut Redis::connect() {
                Ok(r_conn) => {
                    let response_str = serde_json::to_string(&$data).unwrap();
                    if let Err(error) = Redis::set_data::<String, String>(r_conn, uri, response_str) {
                        warn!(target:"macros/request_caching", "Error writing response to cache: {}", error);
                    }
                },
                Err(error) => {
                    warn!(target:"macros/request_caching", "Error connecting to redis: {}", error);
                }
            }
        }

        return Ok($data)
    }
}

pub(crate) use cache_response;
pub(crate) use read_cache_request;
