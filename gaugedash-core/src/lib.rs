pub mod config;
pub mod editor;
pub mod event;
pub mod options;
pub mod threshold;
pub mod widget;

pub use config::{ConfigError, ConfigFile, PanelConfig};
pub use editor::{OnChange, ThresholdListEditor, ThresholdValueChange};
pub use event::{BusEvent, EventBus, PanelEvent, Subscription, options_topic};
pub use options::PanelOptions;
pub use threshold::{ThresholdColor, ThresholdError, ThresholdRow, Thresholds};
pub use widget::{Event, EventResult, Widget, WidgetContainer};
