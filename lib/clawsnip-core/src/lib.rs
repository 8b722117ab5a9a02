//! # Clawsnip Core
//!
//! Generate API documentation snippets from the HTTP exchanges of your tests.
//!
//! A test captures an [`Operation`] (the request it sent and the response it got back),
//! then hands it to [`RestDocumentation::document`] together with the snippets to produce:
//!
//! - **[`CurlRequestSnippet`]** - the equivalent `curl` command line (`curl-request`)
//! - **[`FieldsSnippet`](payload::FieldsSnippet)** - a table of request or response payload
//!   fields (`request-fields`, `response-fields`)
//! - **[`LinksSnippet`](hypermedia::LinksSnippet)** - a table of hypermedia links (`links`)
//!
//! Documentation is checked against the exchange: an undocumented payload field or link,
//! or a required one that is missing, fails the documentation step with a
//! [`SnippetError::Validation`].
//!
//! ## Quick Start
//!
//! ```rust
//! use clawsnip_core::payload::{FieldDescriptor, FieldType, FieldsSnippet};
//! use clawsnip_core::{CurlRequestSnippet, MemorySnippetWriter, RestDocumentation};
//! use clawsnip_core::{Operation, OperationRequest, OperationResponse};
//! use http::{Method, StatusCode};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), clawsnip_core::SnippetError> {
//! let request = OperationRequest::new(Method::GET, "http://localhost:8080/items/1")?
//!     .with_header("Accept", "application/json");
//! let response = OperationResponse::new(StatusCode::OK)
//!     .with_header("Content-Type", "application/json")
//!     .with_content(r#"{"id": 1, "tags": ["new"], "price": null}"#);
//! let operation = Operation::new(request, response);
//!
//! let fields = FieldsSnippet::response([
//!     FieldDescriptor::new("id", "The item identifier"),
//!     FieldDescriptor::new("tags[]", "The item tags"),
//!     FieldDescriptor::new("price", "The item price").with_type(FieldType::Number),
//! ])?;
//!
//! let writer = Arc::new(MemorySnippetWriter::default());
//! let documentation = RestDocumentation::builder()
//!     .with_writer(writer.clone())
//!     .build();
//! documentation.document("get-item", &operation, &[&CurlRequestSnippet, &fields])?;
//!
//! assert_eq!(writer.keys(), ["get-item/curl-request", "get-item/response-fields"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Field Paths
//!
//! Payload fields are addressed with dotted paths:
//!
//! | Path          | Selects                                          |
//! |---------------|--------------------------------------------------|
//! | `a.b`         | member `b` of object `a`                         |
//! | `items[]`     | every element of the `items` array               |
//! | `items[].id`  | the `id` member of every element of `items`      |
//! | `items[1].id` | the `id` member of the second element of `items` |
//! | `['a.b'].c`   | member `c` of the object under the key `a.b`     |
//!
//! A field's type is resolved from the payload when not given explicitly: when the values
//! reached through a wildcard have different types the field is documented as
//! [`Varies`](payload::FieldType::Varies). A field absent from the payload must be given
//! an explicit type.
//!
//! ## Templates
//!
//! Snippets are rendered with [Handlebars](https://handlebarsjs.com/) templates. The
//! built-in templates produce Asciidoctor; any of them can be replaced by putting a
//! `<name>.snippet` file in a templates directory:
//!
//! ```rust
//! use clawsnip_core::RestDocumentation;
//!
//! let documentation = RestDocumentation::builder()
//!     .with_templates_directory("src/docs/templates")
//!     .with_output_directory("target/generated-snippets")
//!     .with_file_extension("md")
//!     .build();
//! ```

pub mod curl;
mod descriptor;
mod documentation;
mod error;
pub mod hypermedia;
mod operation;
pub mod payload;
mod snippet;
pub mod templates;

pub use self::curl::CurlRequestSnippet;
pub use self::descriptor::{Descriptor, DescriptorRegistry};
pub use self::documentation::{RestDocumentation, RestDocumentationBuilder};
pub use self::error::{SnippetError, SnippetValidationError, ValidationTarget};
pub use self::operation::{Headers, Operation, OperationRequest, OperationResponse, RequestPart};
pub use self::snippet::{FileSnippetWriter, MemorySnippetWriter, Snippet, SnippetWriter};
