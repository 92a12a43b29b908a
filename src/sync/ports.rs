//! Collaborator interfaces
//!
//! The synchronization core never owns the text, the map or the host UI. It
//! talks to them through these traits. All methods take `&self`: the
//! collaborators call back into the controller from inside these methods
//! (a text replace notifies change listeners synchronously, for example), so
//! implementations keep their own interior mutability.
//!
//! Offsets are byte offsets into the document text.

use crate::models::PresentationParams;

pub type ChangeCallback = Box<dyn Fn()>;
pub type OffsetCallback = Box<dyn Fn(usize)>;
pub type PayloadCallback = Box<dyn Fn(&str)>;

/// The editable text pane holding the document
pub trait TextBuffer {
    fn text(&self) -> String;

    /// Replace the whole document; `Err` carries the buffer's reason
    fn replace_all_text(&self, text: &str) -> Result<(), String>;

    fn subscribe_to_changes(&self, callback: ChangeCallback);

    fn caret_offset(&self) -> usize;

    fn set_caret_offset(&self, offset: usize);

    /// Scroll so the caret is visible
    fn scroll_to_caret(&self);

    fn subscribe_to_caret_moves(&self, callback: OffsetCallback);
}

/// The map renderer with its drawing tools
pub trait VisualSurface {
    /// Replace everything shown with the features in `json_text`
    fn load_feature_collection(&self, json_text: &str);

    /// `callback` receives the full feature collection as JSON text
    fn subscribe_to_feature_set_changes(&self, callback: PayloadCallback);

    /// `callback` receives the id of the selected feature
    fn subscribe_to_feature_selection(&self, callback: PayloadCallback);

    fn pan_or_fit_to_feature_index(&self, index: usize);

    /// Rebuild the surface with new presentation parameters; features are
    /// cleared and must be loaded again
    fn reload(&self, params: &PresentationParams);

    /// Free the surface; called once on dispose
    fn release(&self);
}

/// The application hosting both panes
pub trait HostEnvironment {
    fn subscribe_to_appearance_change(&self, callback: ChangeCallback);

    fn appearance_params(&self) -> PresentationParams;

    /// Run the host's own formatter over the document
    fn reformat_document(&self) -> Result<(), String>;
}
