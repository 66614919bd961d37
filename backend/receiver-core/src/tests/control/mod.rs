mod actuation;
mod state;
