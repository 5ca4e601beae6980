// Business logic services layer
//
// Record operations composed from the sheet core and the Sheets backend,
// independent of the HTTP surface that exposes them.

pub mod records;
