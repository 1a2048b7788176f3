//! Cross-component choreography: engine plus simulated chains.

mod flows;
