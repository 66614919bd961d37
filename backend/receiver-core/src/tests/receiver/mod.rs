mod connection_state;
