mod helpers;
mod isolation;
mod receiver;
