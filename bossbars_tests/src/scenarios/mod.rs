mod disconnection;
mod lifecycle;
mod tracking;
