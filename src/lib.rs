// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive CLI.
//
// Module responsibilities:
// - `api`: HTTP calls to the analysis backend and the result types.
// - `form`: form state and the submit/complete state machine.
// - `view`: renders a result card as terminal text.
// - `ui`: the `dialoguer` menu that drives `form` through `api`.
// - `config` / `error`: environment configuration and error types.
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod ui;
pub mod view;
