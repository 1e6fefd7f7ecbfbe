// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse plasticity models
//!
//! Long-term (STDP) plasticity is assembled from two component model
//! types: a timing dependence and a weight dependence. Each component
//! carries its own translation table; an [`StdpMechanism`] merges the
//! resolved native sets and requires the components to agree on one native
//! synapse implementation. Short-term (facilitation/depression) dynamics
//! are single model types. [`SynapseDynamics`] pairs the two for a
//! projection.

pub mod cablesim;
pub mod kernelsim;

mod stdp;

pub use stdp::{StdpMechanism, SynapseDynamics};
