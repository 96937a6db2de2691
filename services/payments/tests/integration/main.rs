mod distribute_test;
mod router_test;
mod webhook_test;
