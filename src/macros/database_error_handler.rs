/// unwrap a `QueryResult`, logging and returning the error on failure
macro_rules! db_handle_get_error {
    ( $query:expr, $target:expr, $subject:expr ) => {
        match $query {
            Ok(value) => value,
            Err(error) => {
                error!(target:$target, "Error getting {}: (error: {})", $subject, error);
                return Err(error);
            }
        }
    };
}

pub(crate) use db_handle_get_error;
