mod control;
mod receiver;
