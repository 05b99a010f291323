pub mod executor;
pub mod fuzzy;
pub mod popular;
pub mod prefix;
pub mod results;
pub mod suggest;
