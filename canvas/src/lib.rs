//! Layout-binding engine for an infinite canvas.
//!
//! This crate holds a small in-memory canvas editor and the two demos built on
//! it: a lerped custom cursor that highlights the target it passes over, and
//! "layout bindings" that snap dragged elements into an evenly spaced row
//! inside a container. The host feeds raw pointer and key events to
//! [`engine::EngineCore`] and gets back [`engine::Action`]s describing every
//! change the engine made.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] routing input to the engines |
//! | [`editor`] | Shape/binding CRUD, coordinate transforms, hook dispatch |
//! | [`doc`] | Shape records and the in-memory shape store |
//! | [`shapes`] | Shape kinds, the color palette, and per-kind behavior |
//! | [`binding`] | Layout bindings and the binding store |
//! | [`index`] | Fractional order keys |
//! | [`drag`] | Drag resolution: which container, which slot |
//! | [`reflow`] | Reflow of container members and container size |
//! | [`hit`] | Hit-testing against shapes in paint order |
//! | [`cursor`] | Lerped cursor follower and target highlighting |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`geom`] | Points, sizes, rectangles and the pan/zoom camera |
//! | [`config`] | Layout and cursor configuration |
//! | [`demo`] | Seeding shapes and bindings for the two demos |
//! | [`consts`] | Shared numeric constants |

pub mod binding;
pub mod config;
pub mod consts;
pub mod cursor;
pub mod demo;
pub mod doc;
pub mod drag;
pub mod editor;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod index;
pub mod input;
pub mod reflow;
pub mod shapes;
