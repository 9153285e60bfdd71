// Admin back-office endpoints, one file per resource area.
//
// Everything here requires an ADMIN session token. Mutations return the
// backend's confirmation message; callers re-fetch the affected list
// rather than patching local state.

mod credit;
mod esim;
mod promotions;
mod stock;
mod users;

pub use stock::StockKind;
