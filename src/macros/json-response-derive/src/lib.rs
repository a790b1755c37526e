use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// derive a rocket `Responder` that serializes the struct as a json body
#[proc_macro_derive(JsonResponse)]
pub fn json_response_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let expanded = quote! {
        impl<'r> ::rocket::response::Responder<'r, 'static> for #name {
            fn respond_to(self, _request: &'r ::rocket::Request<'_>) -> ::rocket::response::Result<'static> {
                let body = match ::serde_json::to_string(&self) {
                    Ok(body) => body,
                    Err(_) => return Err(::rocket::http::Status::InternalServerError),
                };

                ::rocket::Response::build()
                    .header(::rocket::http::ContentType::JSON)
                    .sized_body(body.len(), ::std::io::Cursor::new(body))
                    .ok()
            }
        }
    };

    expanded.into()
}
