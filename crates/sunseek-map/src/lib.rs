pub mod headless;
pub mod radius;
pub mod view;

pub use headless::{HeadlessMap, Overlay};
pub use radius::RadiusControl;
pub use view::{
    ListenerId, MapEvent, MapEventKind, MapView, MarkerKind, OverlayId, PolygonStyle, ScreenPoint,
};
