mod receiver_tests;
