// gridmark/src/lib.rs

//! Parametric laser test grids: generate two swept axes, annotate the resulting cells and
//! keep the whole session in a flat, self-describing text file.

use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_pretty_env_logger() {
    INIT.call_once(|| {
        let _ = pretty_env_logger::try_init();
    });
}

pub use annotations::{Annotation, AnnotationStore};
pub use export::{Decoder, Encoder, ExportError, LoadError, MatchTolerance};
pub use globals::{GlobalParameters, InvalidSettingName};
pub use grid::{apply, Cell, GridConfig, GridConfigBuilder, GridError, GridSpec, GridState};
pub use parameter::Parameter;
pub use session::{ImportReport, Session};
pub use summary::Summary;

pub mod annotations;
pub mod axis;
pub mod export;
pub mod globals;
pub mod grid;
pub mod parameter;
pub mod session;
pub mod summary;
